//! Input sanitization for the pieces of SQL that cannot be parameterized.
//!
//! Collection and field names end up inside query text, and filter values
//! are rendered as literals, so both are checked before any SQL is built.

use thiserror::Error;

/// Maximum length for identifiers (collection names, field names)
pub const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Maximum length for string values rendered into filters
pub const MAX_STRING_VALUE_LENGTH: usize = 65535;

/// Upper bound applied to list limits before they reach SQL
pub const MAX_LIMIT: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
  #[error("identifier cannot be empty")]
  EmptyIdentifier,
  #[error("identifier too long: {len} > {max}", len = .0, max = MAX_IDENTIFIER_LENGTH)]
  IdentifierTooLong(usize),
  #[error("invalid collection name '{0}'")]
  InvalidCollectionName(String),
  #[error("invalid field name '{0}'")]
  InvalidFieldName(String),
  #[error("string too long: {len} > {max}", len = .0, max = MAX_STRING_VALUE_LENGTH)]
  StringTooLong(usize),
  #[error("null bytes not allowed in strings")]
  NullByteInString,
}

/// Validates a collection name: lowercase alphanumeric and underscores,
/// not starting with a digit.
pub fn validate_collection_name(s: &str) -> Result<(), SanitizeError> {
  check_length(s)?;
  if !is_identifier(s) {
    return Err(SanitizeError::InvalidCollectionName(s.to_string()));
  }
  Ok(())
}

/// Validates a field name referenced by a filter. Same rules as collection
/// names; fields are flat, dotted paths are not accepted.
pub fn validate_field_name(s: &str) -> Result<(), SanitizeError> {
  check_length(s)?;
  if !is_identifier(s) {
    return Err(SanitizeError::InvalidFieldName(s.to_string()));
  }
  Ok(())
}

fn check_length(s: &str) -> Result<(), SanitizeError> {
  if s.is_empty() {
    return Err(SanitizeError::EmptyIdentifier);
  }
  if s.len() > MAX_IDENTIFIER_LENGTH {
    return Err(SanitizeError::IdentifierTooLong(s.len()));
  }
  Ok(())
}

fn is_identifier(s: &str) -> bool {
  let mut chars = s.chars();
  match chars.next() {
    Some(c) if c.is_ascii_lowercase() || c == '_' => {}
    _ => return false,
  }
  chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Clamps a caller-supplied result limit to [`MAX_LIMIT`]. Values past the
/// bound still satisfy "at most N results", so oversized limits are capped
/// rather than rejected.
pub fn clamp_limit(limit: Option<usize>) -> Option<usize> {
  limit.map(|l| l.min(MAX_LIMIT))
}

/// Escapes a string value for inclusion in a single-quoted SQL literal.
/// Quotes are doubled; null bytes are rejected outright. Backslashes pass
/// through unchanged: both backends treat them as literal characters
/// inside quoted strings.
pub fn escape_string(s: &str) -> Result<String, SanitizeError> {
  if s.len() > MAX_STRING_VALUE_LENGTH {
    return Err(SanitizeError::StringTooLong(s.len()));
  }

  let mut escaped = String::with_capacity(s.len() + 8);
  for c in s.chars() {
    match c {
      '\'' => escaped.push_str("''"),
      '\0' => return Err(SanitizeError::NullByteInString),
      _ => escaped.push(c),
    }
  }

  Ok(escaped)
}
