use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for user registration
///
/// Absent fields deserialize as empty so they are reported by validation
/// rather than by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
  #[serde(default)]
  #[validate(length(min = 1, message = "missing email"))]
  pub email: String,

  #[serde(default)]
  #[validate(length(min = 1, message = "missing password"))]
  pub password: String,
}

/// Request for user login
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
  #[serde(default)]
  #[validate(length(min = 1, message = "missing email"))]
  pub email: String,

  #[serde(default)]
  #[validate(length(min = 1, message = "missing password"))]
  pub password: String,

  /// Zero means the field was not supplied
  #[serde(default)]
  #[validate(range(min = 1, message = "missing app ID"))]
  pub app_id: i32,
}

/// Response after successful user registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
  pub user_id: i64,
}

/// Response after successful user login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
  pub token: String,
  pub expires_at: DateTime<Utc>,
}

/// Error payload returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  /// Machine-readable error code
  pub error: String,
  /// Caller-safe description
  pub message: String,
}
