//! Decoding entry points for wire records.
//!
//! Records are fully typed, so decoding itself is plain serde; these
//! helpers add the two conventions every caller needs: blank-line
//! tolerance in JSONL streams, and errors that carry the offending
//! line number.

use serde::de::DeserializeOwned;
use std::fmt;

/// Errors during wire-record decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// A record failed to decode.
    Decode { message: String },
    /// A line of a JSONL stream failed to decode. 1-based.
    DecodeLine { line: usize, message: String },
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::Decode { message } => {
                write!(f, "record decode error: {}", message)
            }
            InterchangeError::DecodeLine { line, message } => {
                write!(f, "line {}: record decode error: {}", line, message)
            }
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Decode a single JSON record.
pub fn from_json_str<T: DeserializeOwned>(text: &str) -> Result<T, InterchangeError> {
    serde_json::from_str(text).map_err(|e| InterchangeError::Decode {
        message: e.to_string(),
    })
}

/// Decode a JSONL stream, one record per non-blank line.
pub fn from_jsonl_str<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, InterchangeError> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(line).map_err(|e| InterchangeError::DecodeLine {
            line: idx + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParseResult, Token};

    #[test]
    fn test_from_json_str_decodes_record() {
        let result: ParseResult =
            from_json_str(r#"{"valid": true, "sentence": "hay pan"}"#).unwrap();
        assert!(result.valid);
        assert_eq!(result.sentence, "hay pan");
    }

    #[test]
    fn test_from_json_str_reports_decode_error() {
        let err = from_json_str::<ParseResult>("{not json").unwrap_err();
        match err {
            InterchangeError::Decode { message } => assert!(!message.is_empty()),
            other => panic!("expected Decode, got {:?}", other),
        }
    }

    #[test]
    fn test_from_jsonl_str_skips_blank_lines() {
        let text = "\n{\"word\": \"el\", \"tag\": \"DET\"}\n\n{\"word\": \"pan\", \"tag\": \"N\"}\n";
        let tokens: Vec<Token> = from_jsonl_str(text).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].word, "el");
        assert_eq!(tokens[1].tag, "N");
    }

    #[test]
    fn test_from_jsonl_str_carries_line_number() {
        let text = "{\"word\": \"el\", \"tag\": \"DET\"}\nbroken\n";
        let err = from_jsonl_str::<Token>(text).unwrap_err();
        match err {
            InterchangeError::DecodeLine { line, .. } => assert_eq!(line, 2),
            other => panic!("expected DecodeLine, got {:?}", other),
        }
    }
}
