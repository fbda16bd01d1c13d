use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::auth::errors::{AuthError, ErrorKind};

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Missing or malformed input (400 Bad Request)
  Validation(String),

  /// Authentication error
  Auth(AuthErrorKind),

  /// The request deadline elapsed before the work finished (504)
  DeadlineExceeded,

  /// Internal server error (500); the detail is logged, never returned
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Serialize)]
pub enum AuthErrorKind {
  /// Any login failure after validation (400, deliberately non-specific)
  InvalidCredentials,

  /// Email already exists (409)
  EmailAlreadyExists,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::DeadlineExceeded => write!(f, "Deadline exceeded"),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => StatusCode::BAD_REQUEST,
        AuthErrorKind::EmailAlreadyExists => StatusCode::CONFLICT,
      },
      ApiError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("invalid_argument", msg.clone()),
      ApiError::Auth(AuthErrorKind::InvalidCredentials) => (
        "invalid_argument",
        "invalid email or password".to_string(),
      ),
      ApiError::Auth(AuthErrorKind::EmailAlreadyExists) => {
        ("already_exists", "user already exists".to_string())
      }
      ApiError::DeadlineExceeded => ("deadline_exceeded", "request timed out".to_string()),
      ApiError::Internal(msg) => {
        tracing::error!("Internal error: {}", msg);
        ("internal", "internal error".to_string())
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert AuthError to ApiError by its kind
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error.kind() {
      ErrorKind::InvalidInput => ApiError::Validation(error.to_string()),
      ErrorKind::DuplicateEmail => ApiError::Auth(AuthErrorKind::EmailAlreadyExists),
      ErrorKind::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      ErrorKind::Internal => ApiError::Internal(error.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    // Field order in the map is unspecified
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}
