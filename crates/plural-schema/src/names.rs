//! Kind, field and identifier validation.
//!
//! Kind names, indexed field names and entity uuids become single segments
//! of storage paths such as `Car/indexes/brand/<hash>` or `Car/_ids/<uuid>`,
//! so they follow the same rules git applies to a path component:
//! - Must be non-empty
//! - Must not contain `/`, whitespace, or control characters
//! - Must not be `.` or `..`, and must not start with `.`
//! - Kind names must not be the wildcard `*`

use crate::error::{Result, SchemaError};
use crate::kind_ref::WILDCARD;

/// Characters that are forbidden anywhere in a name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', ' ', '\t', '\n', '\r', '\0'];

fn invalid(name: &str, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn validate_segment(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, format!("{what} must not be empty")));
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(invalid(name, format!("contains forbidden character: {ch:?}")));
        }
    }

    if name.chars().any(char::is_control) {
        return Err(invalid(name, "contains a control character"));
    }

    if name.starts_with('.') {
        return Err(invalid(name, format!("{what} must not start with '.'")));
    }

    Ok(())
}

/// Validate a kind name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use plural_schema::names::validate_kind_name;
///
/// assert!(validate_kind_name("Car").is_ok());
/// assert!(validate_kind_name("").is_err());
/// assert!(validate_kind_name("a/b").is_err());
/// assert!(validate_kind_name("*").is_err());
/// ```
pub fn validate_kind_name(name: &str) -> Result<()> {
    if name == WILDCARD {
        return Err(invalid(name, "the wildcard is not a kind name"));
    }
    validate_segment(name, "kind name")
}

/// Validate an indexed field name. Same rules as kind names.
pub fn validate_field_name(name: &str) -> Result<()> {
    validate_segment(name, "field name")
}

/// Validate an entity uuid, which is written verbatim as the last segment
/// of `{Kind}/_ids/{uuid}`. Same rules as kind names.
pub fn validate_uuid(uuid: &str) -> Result<()> {
    validate_segment(uuid, "uuid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(validate_kind_name("Vehicle").is_ok());
        assert!(validate_kind_name("Car2").is_ok());
        assert!(validate_kind_name("has-dash_and.dot").is_ok());
        assert!(validate_field_name("max_speed").is_ok());
        assert!(validate_field_name("uuid").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(validate_kind_name("").is_err());
        assert!(validate_field_name("").is_err());
    }

    #[test]
    fn reject_separators_and_whitespace() {
        assert!(validate_kind_name("a/b").is_err());
        assert!(validate_kind_name("a\\b").is_err());
        assert!(validate_field_name("has space").is_err());
        assert!(validate_field_name("tab\there").is_err());
        assert!(validate_field_name("bell\u{7}").is_err());
    }

    #[test]
    fn reject_dot_prefix() {
        assert!(validate_kind_name(".hidden").is_err());
        assert!(validate_kind_name("..").is_err());
        assert!(validate_field_name(".").is_err());
    }

    #[test]
    fn uuids_must_be_single_segments() {
        assert!(validate_uuid("deadbeef").is_ok());
        assert!(validate_uuid("0190a5c4-7e1d-7b3a-9f00-1c2d3e4f5a6b").is_ok());
        assert!(validate_uuid("a/b").is_err());
        assert!(validate_uuid("..").is_err());
        assert!(validate_uuid("x y").is_err());
        assert!(validate_uuid("").is_err());
    }

    #[test]
    fn wildcard_is_not_a_kind_name() {
        let err = validate_kind_name("*").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidName { ref name, .. } if name == "*"));
        // a field may legitimately be called anything path-safe
        assert!(validate_field_name("*").is_ok());
    }
}
