use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Message used when a failure carries no CAMS-specific context.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown Error";

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// Category of a [`CamsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Unknown,
    NotFound,
    BadRequest,
    Forbidden,
}

impl ErrorKind {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

/// One hop of the module trail recorded while an error travels up the call stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CamsStackEntry {
    pub module: String,
    pub message: String,
}

/// Error surfaced by CAMS repositories and use cases.
///
/// Serializes to the camelCase shape returned at the API boundary, with `status`
/// rendered as a plain number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{module}: {message}")]
#[must_use]
pub struct CamsError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    pub status: StatusCode,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cams_stack: Vec<CamsStackEntry>,
}

impl CamsError {
    pub fn new(kind: ErrorKind, module: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: kind.status(),
            module: module.into(),
            original_error: None,
            data: None,
            cams_stack: Vec::new(),
        }
    }

    pub fn unknown(module: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, module, UNKNOWN_ERROR_MESSAGE)
    }

    pub fn not_found(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, module, message)
    }

    pub fn bad_request(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, module, message)
    }

    pub fn forbidden(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, module, message)
    }

    pub fn with_original_error(mut self, original: impl Into<String>) -> Self {
        self.original_error = Some(original.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Append a hop to the module trail, keeping the original message and status.
    pub fn with_stack_entry(mut self, module: impl Into<String>, message: impl Into<String>) -> Self {
        self.cams_stack.push(CamsStackEntry {
            module: module.into(),
            message: message.into(),
        });
        self
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn kind_determines_status() {
        assert_eq!(
            CamsError::unknown("M").status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(CamsError::not_found("M", "x").status, StatusCode::NOT_FOUND);
        assert_eq!(CamsError::bad_request("M", "x").status, StatusCode::BAD_REQUEST);
        assert_eq!(CamsError::forbidden("M", "x").status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn serializes_camel_case_with_numeric_status() {
        let err = CamsError::unknown("ORDERS")
            .with_original_error("boom")
            .with_stack_entry("USE-CASE", "Failed to load orders.");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["status"], 500);
        assert_eq!(json["module"], "ORDERS");
        assert_eq!(json["message"], UNKNOWN_ERROR_MESSAGE);
        assert_eq!(json["originalError"], "boom");
        assert_eq!(json["camsStack"][0]["module"], "USE-CASE");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn deserializes_status_from_u16() {
        let json = r#"{"kind":"NOT_FOUND","message":"gone","status":404,"module":"M"}"#;
        let err: CamsError = serde_json::from_str(json).unwrap();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.is_not_found());
        assert!(err.cams_stack.is_empty());
    }

    #[test]
    fn display_includes_module() {
        let err = CamsError::bad_request("TRUSTEE-NOTES", "Missing trustee id.");
        assert_eq!(err.to_string(), "TRUSTEE-NOTES: Missing trustee id.");
    }
}
