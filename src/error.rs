//! Typed errors and normalization of HTTP failures into the shape UI code renders.

use crate::case::to_camel_case;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("duplicate cache key prefix: {0}")]
    DuplicatePrefix(String),
    #[error("duplicate resource path: {0}")]
    DuplicatePath(String),
    #[error("invalid resource descriptor '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },
    #[error("invalid pattern for field {field}: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("env: {0}")]
    Env(String),
}

/// Failures below the normalization boundary. Never handed to UI code directly.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("network: {0}")]
    Network(String),
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("http {status}")]
    Http { status: u16, body: Value },
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Validation,
    Unauthorized,
    NotFound,
    Server,
    Unknown,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 409 | 422 => ErrorKind::Validation,
            401 | 403 => ErrorKind::Unauthorized,
            404 => ErrorKind::NotFound,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            ErrorKind::Network => "Unable to reach the server",
            ErrorKind::Validation => "Some fields are invalid",
            ErrorKind::Unauthorized => "You are not allowed to do this",
            ErrorKind::NotFound => "The requested record was not found",
            ErrorKind::Server => "The server failed to process the request",
            ErrorKind::Unknown => "Something went wrong",
        }
    }
}

/// Normalized error: one message for a toast or banner, plus optional
/// per-field messages keyed by the form field name.
#[derive(Error, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn validation(fields: BTreeMap<String, String>) -> Self {
        let message = match fields.len() {
            1 => fields.values().next().cloned().unwrap_or_default(),
            _ => ErrorKind::Validation.fallback_message().to_string(),
        };
        Self {
            kind: ErrorKind::Validation,
            message,
            field_errors: Some(fields),
        }
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.as_ref()?.get(field).map(String::as_str)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Build from an HTTP error status and its (possibly empty) JSON body.
    /// Understands `{"error": {"code", "message", "details"}}` and `{"message", "errors"}`.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let kind = ErrorKind::from_status(status);
        let (message, details) = match body.get("error") {
            Some(Value::Object(err)) => (
                err.get("message").and_then(Value::as_str),
                err.get("details"),
            ),
            Some(Value::String(s)) => (Some(s.as_str()), body.get("errors")),
            _ => (
                body.get("message").and_then(Value::as_str),
                body.get("errors"),
            ),
        };
        let field_errors = details.and_then(field_errors_from);
        Self {
            kind,
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or(kind.fallback_message())
                .to_string(),
            field_errors,
        }
    }
}

fn field_errors_from(details: &Value) -> Option<BTreeMap<String, String>> {
    let obj = details.as_object()?;
    let mut out = BTreeMap::new();
    for (k, v) in obj {
        let msg = match v {
            Value::String(s) => s.clone(),
            Value::Array(items) => match items.first() {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => continue,
            },
            Value::Null => continue,
            other => other.to_string(),
        };
        out.insert(to_camel_case(k), msg);
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

impl From<ClientError> for ApiError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Http { status, body } => ApiError::from_response(status, &body),
            ClientError::Network(msg) => {
                tracing::debug!(error = %msg, "network failure");
                ApiError::new(ErrorKind::Network, ErrorKind::Network.fallback_message())
            }
            ClientError::Decode(err) => {
                ApiError::new(ErrorKind::Unknown, format!("unexpected response: {}", err))
            }
            ClientError::Config(err) => ApiError::new(ErrorKind::Unknown, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_with_details_becomes_field_errors() {
        let body = json!({
            "error": {
                "code": "validation_error",
                "message": "name is required",
                "details": { "account_name": ["is required", "too short"], "code": "taken" }
            }
        });
        let err = ApiError::from_response(422, &body);
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "name is required");
        assert_eq!(err.field_error("accountName"), Some("is required"));
        assert_eq!(err.field_error("code"), Some("taken"));
    }

    #[test]
    fn flat_body_and_status_mapping() {
        let err = ApiError::from_response(403, &json!({ "message": "no access" }));
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "no access");
        assert!(err.field_errors.is_none());

        let err = ApiError::from_response(404, &Value::Null);
        assert!(err.is_not_found());
        assert_eq!(err.message, "The requested record was not found");

        assert_eq!(ErrorKind::from_status(503), ErrorKind::Server);
        assert_eq!(ErrorKind::from_status(418), ErrorKind::Unknown);
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
    }

    #[test]
    fn network_failure_has_no_field_errors() {
        let err: ApiError = ClientError::Network("connection refused".into()).into();
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(err.field_errors.is_none());
    }

    #[test]
    fn single_field_validation_uses_field_message() {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), "name is required".to_string());
        let err = ApiError::validation(fields);
        assert_eq!(err.message, "name is required");
    }
}
