//! Core types shared by the codec.

use serde_json::Value;

/// Media type of JSON:API documents.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// Layout used for the `iso8601` time encoding.
pub const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Field configuration tokens.
pub(crate) const ROLE_PRIMARY: &str = "primary";
pub(crate) const ROLE_CLIENT_ID: &str = "client-id";
pub(crate) const ROLE_ATTRIBUTE: &str = "attr";
pub(crate) const ROLE_RELATION: &str = "relation";
pub(crate) const ROLE_POLY_RELATION: &str = "polyrelation";
pub(crate) const ROLE_LINKS: &str = "links";
pub(crate) const MODIFIER_OMIT_EMPTY: &str = "omitempty";
pub(crate) const MODIFIER_ISO8601: &str = "iso8601";
pub(crate) const MODIFIER_RFC3339: &str = "rfc3339";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Wire encoding of date/time attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeFormat {
    /// Seconds since the Unix epoch, as a JSON integer.
    #[default]
    Epoch,
    /// `2016-08-17T08:27:12Z`.
    Iso8601,
    /// RFC 3339 with second precision, rendered in UTC.
    Rfc3339,
}

impl TimeFormat {
    /// Describes what this encoding accepts, for error messages.
    pub fn expectation(&self) -> &'static str {
        match self {
            TimeFormat::Epoch => "only numbers can be parsed as dates, unix timestamps",
            TimeFormat::Iso8601 => "only strings can be parsed as dates, ISO 8601 timestamps",
            TimeFormat::Rfc3339 => "only strings can be parsed as dates, RFC 3339 timestamps",
        }
    }
}

/// How related resources are placed in a marshaled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Relationships carry identifiers; full resources go to `included`.
    #[default]
    Sideload,
    /// Relationships carry the full nested resources; no `included`.
    Embed,
}

/// Options for marshaling.
#[derive(Debug, Clone, Default)]
pub struct MarshalOptions {
    pub mode: Mode,
}

impl MarshalOptions {
    /// Side-loading options (the default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that inline related resources.
    pub fn embedded() -> Self {
        Self { mode: Mode::Embed }
    }

    /// Set the placement mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

/// Options for unmarshaling.
#[derive(Debug, Clone, Default)]
pub struct UnmarshalOptions {
    /// When true, a resource whose `type` differs from the target model's
    /// primary type name is rejected. Polymorphic relations always match by
    /// type name regardless of this flag.
    pub strict_types: bool,
}

impl UnmarshalOptions {
    /// Create lenient options (default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict type checking.
    pub fn strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(1.5)), "number");
        assert_eq!(json_type_name(&json!({"a": 1})), "object");
        assert_eq!(json_type_name(&json!([1])), "array");
    }

    #[test]
    fn marshal_options_default_to_sideload() {
        assert_eq!(MarshalOptions::new().mode, Mode::Sideload);
        assert_eq!(MarshalOptions::embedded().mode, Mode::Embed);
        assert_eq!(MarshalOptions::new().mode(Mode::Embed).mode, Mode::Embed);
    }

    #[test]
    fn unmarshal_options_lenient_by_default() {
        assert!(!UnmarshalOptions::new().strict_types);
        assert!(UnmarshalOptions::new().strict_types(true).strict_types);
    }
}
