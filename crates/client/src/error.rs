// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unified error taxonomy for the data-access layer.
//!
//! Every failure surfaced by the HTTP client and the resource services is an
//! [`ApiError`] with a closed [`ErrorKind`], so callers switch on a known set
//! instead of probing shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed message for failures where no response was received at all.
pub const CONNECT_MESSAGE: &str =
    "Unable to connect to the server. Please check your network connection or try again later.";

/// Fallback when the server reports an error without a usable message.
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Closed set of failure classes for backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No response at all (DNS, refused connection, dropped mid-body).
    Connectivity,
    /// HTTP 401: the session has been wiped; not locally recoverable.
    Auth,
    /// HTTP 403: authenticated but not allowed.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// Field-level messages, from the backend or from local pre-validation.
    Validation,
    /// Anything else, including HTTP-success bodies with a non-"200" code.
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connectivity => "CONNECTIVITY",
            Self::Auth => "AUTH",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Kind implied by an HTTP status when the body gives no better hint.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Auth,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level validation message, passed through from the backend or
/// produced locally before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Normalized error for every failure path in the data-access layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), fields: Vec::new() }
    }

    /// The fixed connectivity error (no response received).
    pub fn connectivity() -> Self {
        Self::new(ErrorKind::Connectivity, CONNECT_MESSAGE)
    }

    /// A validation error carrying field-level messages.
    pub fn validation(fields: Vec<FieldError>) -> Self {
        let message = fields
            .first()
            .map(|f| f.message.clone())
            .unwrap_or_else(|| GENERIC_MESSAGE.to_owned());
        Self { kind: ErrorKind::Validation, message, fields }
    }

    /// Message for a named field, if the error carries one.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.field == name).map(|f| f.message.as_str())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
