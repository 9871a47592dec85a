//! Wire-level errors.

use thiserror::Error;

/// Errors produced while parsing or interrogating a wire command.
#[derive(Debug, Error)]
pub enum WireError {
    /// A field the command type requires is absent.
    #[error("{tag}: missing required field '{field}'")]
    MissingField {
        /// Command tag the field was expected on.
        tag: String,
        /// Name of the absent field.
        field: String,
    },

    /// A field is present but has the wrong JSON shape.
    #[error("{tag}: field '{field}' is not a {expected}")]
    BadField {
        /// Command tag carrying the field.
        tag: String,
        /// Name of the malformed field.
        field: String,
        /// Human-readable expected shape ("string", "array", ...).
        expected: &'static str,
    },

    /// The raw line does not have the `TAG {json}` shape.
    #[error("malformed wire line: {0:?}")]
    BadLine(String),

    /// The payload is not a JSON object.
    #[error("{0}: payload is not a JSON object")]
    BadPayload(String),

    /// JSON decode failure in the payload.
    #[error("payload decode error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WireError::MissingField { tag: "MSG".into(), field: "message".into() };
        assert_eq!(err.to_string(), "MSG: missing required field 'message'");

        let err = WireError::BadField { tag: "LIS".into(), field: "characters".into(), expected: "array" };
        assert_eq!(err.to_string(), "LIS: field 'characters' is not a array");
    }
}
