use serde::Serialize;
use serde_json::Value;

use crate::error_handler::{AppError, AppResult};

/// Request payload for /ask.
///
/// `question` is kept as raw JSON so a wrong type can be told apart from a
/// missing value. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct AskRequest {
    pub question: Option<Value>,
}

/// Response payload for /ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Model answer (plain text).
    pub answer: String,
}

impl AskRequest {
    /// Decodes the raw request body.
    ///
    /// An empty body and a literal `null` count as a request without a
    /// question. Content-Type is not checked.
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON in request body: {e}")))?;

        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(mut fields) => Ok(Self {
                question: fields.remove("question"),
            }),
            _ => Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            )),
        }
    }

    /// Returns the question exactly as sent.
    ///
    /// # Errors
    /// - [`AppError::MissingQuestion`] for a missing key, `null`, or `""`
    /// - [`AppError::BadRequest`] when `question` is not a string
    pub fn into_question(self) -> AppResult<String> {
        match self.question {
            None | Some(Value::Null) => Err(AppError::MissingQuestion),
            Some(Value::String(q)) if q.is_empty() => Err(AppError::MissingQuestion),
            Some(Value::String(q)) => Ok(q),
            Some(_) => Err(AppError::BadRequest(
                "'question' must be a string".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(body: &str) -> AppResult<String> {
        AskRequest::from_body(body.as_bytes())?.into_question()
    }

    #[test]
    fn question_is_returned_verbatim() {
        assert_eq!(
            question(r#"{"question":"  What is 2+2?\n"}"#).unwrap(),
            "  What is 2+2?\n"
        );
    }

    #[test]
    fn whitespace_question_is_still_a_question() {
        assert_eq!(question(r#"{"question":"   "}"#).unwrap(), "   ");
    }

    #[test]
    fn extra_fields_are_ignored() {
        assert_eq!(question(r#"{"question":"hi","lang":"en"}"#).unwrap(), "hi");
    }

    #[test]
    fn absent_values_are_all_missing_question() {
        for body in ["", "   \n", "null", "{}", r#"{"question":null}"#, r#"{"question":""}"#] {
            assert!(
                matches!(question(body), Err(AppError::MissingQuestion)),
                "body {body:?} should be missing question"
            );
        }
    }

    #[test]
    fn non_string_question_is_rejected() {
        let err = question(r#"{"question":42}"#).unwrap_err();
        assert_eq!(err.to_string(), "'question' must be a string");
    }

    #[test]
    fn malformed_json_is_bad_request() {
        let err = question(r#"{"question":"#).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.starts_with("Invalid JSON")));

        for body in ["[1,2,3]", r#"["hi"]"#, r#""hi""#] {
            let err = question(body).unwrap_err();
            assert_eq!(err.to_string(), "Request body must be a JSON object");
        }
    }
}
