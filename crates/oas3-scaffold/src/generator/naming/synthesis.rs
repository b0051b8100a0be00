//! Deterministic names for things the document never names.
//!
//! Every function here is a pure function of its inputs. Inline objects and collections are named
//! after the chain of receivers that lead to them, so the same document always produces the same
//! declarations.

use http::Method;
use mediatype::MediaType;

use super::identifiers::to_pascal_case;

const APPLICATION: &str = "application";
const JSON: &str = "json";

/// Builds an operation id from the method and path when the document does not declare one.
///
/// `POST /items/{id}` becomes `post_items_by_id`.
pub fn synthesize_operation_id(method: &Method, path: &str) -> String {
  let segments = path
    .split('/')
    .filter(|segment| !segment.is_empty())
    .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
      Some(param) => format!("by_{param}"),
      None => segment.to_string(),
    })
    .collect::<Vec<_>>();

  let method = method.as_str().to_lowercase();
  if segments.is_empty() {
    method
  } else {
    format!("{method}_{}", segments.join("_"))
  }
}

/// Normalized operation name, falling back to a synthesized id.
pub fn operation_name(operation_id: Option<&str>, method: &Method, path: &str) -> String {
  match operation_id.map(to_pascal_case).filter(|name| !name.is_empty()) {
    Some(name) => name,
    None => to_pascal_case(&synthesize_operation_id(method, path)),
  }
}

/// Short title for a media type, used to tell per-media-type declarations apart.
///
/// The `application` top-level type and a `json` subtype or suffix carry no information and are
/// dropped, so `application/json` yields an empty title.
pub fn media_type_title(media_type: &str) -> String {
  let trimmed = media_type.split(';').next().unwrap_or_default().trim();
  if trimmed == "*/*" {
    return "Any".to_string();
  }

  let Ok(parsed) = MediaType::parse(trimmed) else {
    return to_pascal_case(trimmed.strip_prefix("application/").unwrap_or(trimmed));
  };

  let ty = parsed.ty.as_str();
  let subty = parsed.subty.as_str();
  let subty = if parsed.suffix.is_none() && subty.eq_ignore_ascii_case(JSON) {
    ""
  } else {
    subty
  };

  let mut title = String::new();
  if !ty.eq_ignore_ascii_case(APPLICATION) {
    title.push_str(&to_pascal_case(ty));
  }
  if subty != "*" {
    title.push_str(&to_pascal_case(subty));
  }
  if let Some(suffix) = &parsed.suffix
    && !suffix.as_str().eq_ignore_ascii_case(JSON)
  {
    title.push_str(&to_pascal_case(suffix.as_str()));
  }
  title
}

pub fn status_title(status_code: &str) -> String {
  to_pascal_case(status_code)
}

pub fn property_receiver(parent: &str, property: &str) -> String {
  format!("{parent}{}", to_pascal_case(property))
}

/// Receiver for the item of an inline collection, e.g. `WidgetTags` + `Array`.
pub fn item_receiver(receiver: &str, item_kind: &str) -> String {
  format!("{receiver}{}", to_pascal_case(item_kind))
}

/// Receiver for the 0-based `index`th inline variant of a union.
pub fn variant_receiver(receiver: &str, variant_kind: &str, index: usize) -> String {
  format!("{receiver}{}{}", to_pascal_case(variant_kind), index + 1)
}

pub fn handler_name(operation: &str, media_type: Option<&str>) -> String {
  match media_type {
    Some(media_type) => format!("{operation}Handler{}", media_type_title(media_type)),
    None => format!("{operation}Handler"),
  }
}

pub fn request_body_receiver(operation: &str, media_type: &str) -> String {
  format!("{operation}{}Request", media_type_title(media_type))
}

pub fn response_body_receiver(operation: &str, status_code: &str, content_type: Option<&str>) -> String {
  let media = content_type.map(media_type_title).unwrap_or_default();
  format!("{operation}{}{media}Response", status_title(status_code))
}

pub fn response_header_receiver(operation: &str, status_code: &str, header: &str) -> String {
  format!(
    "{operation}{}{}Header",
    status_title(status_code),
    to_pascal_case(header)
  )
}

pub fn parameter_receiver(operation: &str, parameter: &str) -> String {
  property_receiver(operation, parameter)
}

pub fn parameters_type_name(operation: &str) -> String {
  format!("{operation}Parameters")
}

pub fn response_type_name(operation: &str) -> String {
  format!("{operation}Response")
}
