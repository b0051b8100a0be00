pub mod identifiers;
pub mod synthesis;


pub use identifiers::to_pascal_case;
