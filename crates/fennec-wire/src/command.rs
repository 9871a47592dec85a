//! The wire command map.

use crate::error::WireError;
use serde_json::{Map, Value};
use std::fmt;

/// One protocol message in either direction: a command tag plus a
/// string-keyed map of loosely-typed fields.
///
/// The map is deliberately free-form. Handlers pull the fields they need
/// through the typed accessors; optional fields that are absent read as
/// `None`, and only [`require_str`](WireCommand::require_str)-style
/// accessors turn absence into an error. A command is immutable once
/// dispatched — requeueing resubmits the same value verbatim.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WireCommand {
    /// Command type tag (`"NLN"`, `"ICH"`, `"ignore"`, ...).
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub tag: String,

    /// Free-form payload fields.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub body: Map<String, Value>,
}

impl WireCommand {
    /// Create a command with an empty payload.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), body: Map::new() }
    }

    /// Builder-style string field.
    pub fn with_str(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.body.insert(key.into(), Value::String(value.into()));
        self
    }

    /// Builder-style field of any JSON shape.
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.body.insert(key.into(), value);
        self
    }

    /// Read an optional string field. Absent or non-string reads as `None`.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.body.get(key).and_then(Value::as_str)
    }

    /// Read an optional unsigned integer field.
    pub fn u64_field(&self, key: &str) -> Option<u64> {
        self.body.get(key).and_then(Value::as_u64)
    }

    /// Read an optional array field.
    pub fn array_field(&self, key: &str) -> Option<&Vec<Value>> {
        self.body.get(key).and_then(Value::as_array)
    }

    /// Read a required string field, failing loudly when absent.
    pub fn require_str(&self, key: &str) -> Result<&str, WireError> {
        match self.body.get(key) {
            None => Err(WireError::MissingField { tag: self.tag.clone(), field: key.to_string() }),
            Some(Value::String(s)) => Ok(s),
            Some(_) => {
                Err(WireError::BadField { tag: self.tag.clone(), field: key.to_string(), expected: "string" })
            }
        }
    }

    /// Read a required unsigned integer field, failing loudly when absent.
    pub fn require_u64(&self, key: &str) -> Result<u64, WireError> {
        match self.body.get(key) {
            None => Err(WireError::MissingField { tag: self.tag.clone(), field: key.to_string() }),
            Some(value) => value.as_u64().ok_or_else(|| WireError::BadField {
                tag: self.tag.clone(),
                field: key.to_string(),
                expected: "unsigned integer",
            }),
        }
    }

    /// Read a required array field, failing loudly when absent.
    pub fn require_array(&self, key: &str) -> Result<&Vec<Value>, WireError> {
        match self.body.get(key) {
            None => Err(WireError::MissingField { tag: self.tag.clone(), field: key.to_string() }),
            Some(Value::Array(a)) => Ok(a),
            Some(_) => {
                Err(WireError::BadField { tag: self.tag.clone(), field: key.to_string(), expected: "array" })
            }
        }
    }

    /// Collect a required array of strings, skipping non-string entries.
    pub fn require_name_list(&self, key: &str) -> Result<Vec<String>, WireError> {
        let raw = self.require_array(key)?;
        Ok(raw.iter().filter_map(Value::as_str).map(str::to_string).collect())
    }

    /// Well-known `character` field.
    pub fn character(&self) -> Option<&str> {
        self.str_field("character")
    }

    /// Well-known `channel` field.
    pub fn channel(&self) -> Option<&str> {
        self.str_field("channel")
    }

    /// Well-known `recipient` field.
    pub fn recipient(&self) -> Option<&str> {
        self.str_field("recipient")
    }

    /// Well-known `message` field.
    pub fn message(&self) -> Option<&str> {
        self.str_field("message")
    }

    /// Well-known `action` field (list-style commands: add/delete/init).
    pub fn action(&self) -> Option<&str> {
        self.str_field("action")
    }

    /// Required `character` field.
    pub fn require_character(&self) -> Result<&str, WireError> {
        self.require_str("character")
    }

    /// Required `channel` field.
    pub fn require_channel(&self) -> Result<&str, WireError> {
        self.require_str("channel")
    }

    /// Parse a raw `TAG {json}` line.
    ///
    /// The payload object is optional: `PIN` and `TAG {...}` are both valid.
    /// The tag must be a non-empty run of ASCII alphanumerics or `_`.
    pub fn parse_line(line: &str) -> Result<Self, WireError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (tag, rest) = match line.find(' ') {
            Some(idx) => (&line[..idx], line[idx + 1..].trim_start()),
            None => (line, ""),
        };

        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(WireError::BadLine(line.to_string()));
        }

        let body = if rest.is_empty() {
            Map::new()
        } else {
            match serde_json::from_str::<Value>(rest)? {
                Value::Object(map) => map,
                _ => return Err(WireError::BadPayload(tag.to_string())),
            }
        };

        Ok(Self { tag: tag.to_string(), body })
    }

    /// Encode back to the `TAG {json}` line form (no trailing newline).
    pub fn encode_line(&self) -> String {
        if self.body.is_empty() {
            self.tag.clone()
        } else {
            // Map serialization over in-memory values cannot fail.
            let payload = serde_json::to_string(&self.body).unwrap_or_else(|_| "{}".to_string());
            format!("{} {}", self.tag, payload)
        }
    }
}

impl fmt::Display for WireCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode_line())
    }
}
