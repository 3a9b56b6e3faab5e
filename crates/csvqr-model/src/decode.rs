use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The page carries no block with the requested id.
    Missing,
    /// The block text is not valid JSON.
    Syntax { line: usize, column: usize, msg: String },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Missing => write!(f, "source block missing"),
            DecodeError::Syntax { line, column, msg } => {
                write!(f, "invalid json at {}:{}: {}", line, column, msg)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Parses raw block text. Never panics; all failures come back as `Err`.
pub fn decode(text: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(text).map_err(|e| DecodeError::Syntax {
        line: e.line(),
        column: e.column(),
        msg: e.to_string(),
    })
}

/// Decodes `text` (absent when the backing block is missing), substituting an empty
/// object for any failure. A literal `null` document is treated the same way.
pub fn decode_or_empty(label: &str, text: Option<&str>) -> Value {
    let decoded = match text {
        Some(t) => decode(t),
        None => Err(DecodeError::Missing),
    };
    match decoded {
        Ok(Value::Null) => empty_document(),
        Ok(v) => v,
        Err(err) => {
            log::debug!(target: "decode", "{}: {} (using empty document)", label, err);
            empty_document()
        }
    }
}

#[inline]
pub fn empty_document() -> Value {
    Value::Object(Map::new())
}
