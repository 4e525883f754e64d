use http::StatusCode;
use thiserror::Error;

/// Longest body excerpt kept in an error message.
const ERROR_BODY_PREVIEW_LIMIT: usize = 256;

/// Errors returned by [`crate::CatalogClientV1`] implementations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CatalogError {
    /// Non-2xx response from a service.
    #[error("HTTP {status}: {message}")]
    Remote { status: StatusCode, message: String },

    /// Network or connection failure.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response body did not match the expected model.
    #[error("JSON parsing failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request could not be built from the given input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CatalogError {
    /// Build a `Remote` error from a failed response.
    ///
    /// The message is taken from the body, in order: problem `detail`,
    /// problem `title`, `errors[0].msg`, `message`, then a raw preview.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|json| message_from_json(&json))
            .unwrap_or_else(|| body_preview(status, body));
        Self::Remote { status, message }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn message_from_json(json: &serde_json::Value) -> Option<String> {
    let text = |v: Option<&serde_json::Value>| {
        v.and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };
    text(json.get("detail"))
        .or_else(|| text(json.get("title")))
        .or_else(|| text(json.pointer("/errors/0/msg")))
        .or_else(|| text(json.get("message")))
}

fn body_preview(status: StatusCode, body: &[u8]) -> String {
    let raw = String::from_utf8_lossy(body);
    let raw = raw.trim();
    if raw.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned();
    }
    match raw.char_indices().nth(ERROR_BODY_PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_owned(),
    }
}
