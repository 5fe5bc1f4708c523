//! Client Errors
//!
//! Normalized failures for every API call, plus helpers that read the
//! backend's success and error envelopes.

use serde_json::Value;
use thiserror::Error;

use crate::config::ConfigError;

pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";
pub const TIMEOUT_MESSAGE: &str = "The server took too long to respond.";
pub const NETWORK_MESSAGE: &str = "Unable to reach the server.";

pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by every client call
///
/// `Clone` because a single refresh outcome is handed to every waiter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No session token; the request was never sent
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("unauthorized: {}", .message.as_deref().unwrap_or("401"))]
    Unauthorized { message: Option<String> },
    #[error("forbidden: {}", .message.as_deref().unwrap_or("403"))]
    Forbidden { message: Option<String> },
    #[error("request failed with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("could not encode request body: {0}")]
    Encode(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Map a non-2xx response to an error, keeping the server's message
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| extract_message(&value));
        match status {
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden { message },
            _ => Self::Status { status, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Human-readable message for toasts and inline errors
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message: Some(m) }
            | Self::Forbidden { message: Some(m) }
            | Self::Status { message: Some(m), .. } => m.clone(),
            Self::NotAuthenticated => "Please sign in to continue.".to_string(),
            Self::Timeout => TIMEOUT_MESSAGE.to_string(),
            Self::Network(_) => NETWORK_MESSAGE.to_string(),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }
}

/// Best-effort message from the backend error envelope
///
/// Looks at `message`, `error` (string or `{message}`), `errors[0].message`
/// and `detail`, in that order.
pub fn extract_message(body: &Value) -> Option<String> {
    let candidates = [
        body.get("message"),
        body.get("error").filter(|e| e.is_string()),
        body.get("error").and_then(|e| e.get("message")),
        body.get("errors").and_then(|e| e.get(0)).and_then(|e| e.get("message")),
        body.get("detail"),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

const ENVELOPE_KEYS: &[&str] = &["data", "message", "success", "meta"];

/// Strip a `{ data, message?, success?, meta? }` wrapper from success bodies
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map)
            if map.contains_key("data") && map.keys().all(|k| ENVELOPE_KEYS.contains(&k.as_str())) =>
        {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
