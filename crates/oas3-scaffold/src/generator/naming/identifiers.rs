use std::{collections::HashSet, sync::LazyLock};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

pub(crate) static FORBIDDEN_IDENTIFIERS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "try", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen", "self", "Self",
  ]
  .into_iter()
  .collect()
});

static RESERVED_PASCAL_CASE: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "Clone", "Copy", "Default", "Display", "Option", "Result", "Self", "Send", "String", "Sync", "Type", "Vec",
  ]
  .into_iter()
  .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("static regex"));
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").expect("static regex"));

/// Normalizes arbitrary text into a capitalized word-boundary identifier.
///
/// Letters keep their case except the first letter of each word, which is upper-cased. Digits are
/// kept and start a new word. Every other character is dropped and also starts a new word, so
/// `test-case`, `test_case` and `test case` all become `TestCase`, and `test1case` becomes
/// `Test1Case`. Non-ASCII letters are kept (`хлеб` becomes `Хлеб`).
pub fn to_pascal_case(input: &str) -> String {
  input.trim().chars().pascal_words().collect()
}

/// Iterator adapter behind [`to_pascal_case`].
pub trait PascalWordsExt: Iterator<Item = char> {
  fn pascal_words(self) -> PascalWords<Self>
  where
    Self: Sized;
}

impl<I> PascalWordsExt for I
where
  I: Iterator<Item = char>,
{
  fn pascal_words(self) -> PascalWords<Self>
  where
    Self: Sized,
  {
    PascalWords {
      iter: self,
      capitalize: true,
      pending_upper: None,
    }
  }
}

pub struct PascalWords<I>
where
  I: Iterator<Item = char>,
{
  iter: I,
  capitalize: bool,
  pending_upper: Option<std::char::ToUppercase>,
}

impl<I> Iterator for PascalWords<I>
where
  I: Iterator<Item = char>,
{
  type Item = char;

  fn next(&mut self) -> Option<Self::Item> {
    if let Some(ref mut upper) = self.pending_upper {
      if let Some(c) = upper.next() {
        return Some(c);
      }
      self.pending_upper = None;
    }

    loop {
      let c = self.iter.next()?;

      if c.is_numeric() {
        self.capitalize = true;
        return Some(c);
      }

      if c.is_alphabetic() && c.is_uppercase() {
        self.capitalize = false;
        return Some(c);
      }

      if c.is_alphabetic() && c.is_lowercase() {
        if !std::mem::replace(&mut self.capitalize, false) {
          return Some(c);
        }
        let mut upper = c.to_uppercase();
        let first = upper.next();
        self.pending_upper = Some(upper);
        return first;
      }

      self.capitalize = true;
    }
  }
}

/// Transliterates to ASCII, replaces invalid characters with underscores, collapses consecutive
/// underscores, and trims leading or trailing underscores.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Converts a string into a valid Rust field name (`snake_case`).
///
/// Keywords become raw identifiers, except `self`, `crate` and `super` which cannot be raw and get a
/// trailing `_`. A leading digit gets an `_` prefix and an empty result becomes `_`.
pub fn to_rust_field_name(name: &str) -> String {
  let mut ident = sanitize(name).to_snake_case();

  if ident.is_empty() {
    return "_".to_string();
  }

  if matches!(ident.as_str(), "self" | "crate" | "super") {
    return format!("{ident}_");
  }

  if FORBIDDEN_IDENTIFIERS.contains(ident.as_str()) {
    return format!("r#{ident}");
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }

  ident
}

/// Converts a normalized type name into a valid ASCII Rust type name.
///
/// A leading digit gets a `T` prefix, names that shadow prelude items get a `Type` suffix and an
/// empty result becomes `Unnamed`.
pub fn to_rust_type_name(name: &str) -> String {
  let mut ident = to_pascal_case(&any_ascii(name))
    .chars()
    .filter(char::is_ascii_alphanumeric)
    .collect::<String>();

  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if RESERVED_PASCAL_CASE.contains(ident.as_str()) {
    ident.push_str("Type");
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }

  ident
}

/// Returns `base_name`, or the first `{base_name}{n}` (n from 2) that `is_used` rejects.
pub(crate) fn ensure_unique(base_name: &str, is_used: impl Fn(&str) -> bool) -> String {
  if !is_used(base_name) {
    return base_name.to_string();
  }

  let mut i = 2;
  loop {
    let new_name = format!("{base_name}{i}");
    if !is_used(&new_name) {
      return new_name;
    }
    i += 1;
  }
}
