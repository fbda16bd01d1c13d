use thiserror::Error;

use super::value_objects::ValueObjectError;

/// Caller-facing classification of every authentication failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed or missing caller-supplied fields
  InvalidInput,
  /// Registration attempted with an email already on file
  DuplicateEmail,
  /// Any login failure after input validation
  InvalidCredentials,
  /// Unexpected collaborator failure
  Internal,
}

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("email already exists")]
  EmailAlreadyExists,

  #[error("repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("hash error: {0}")]
  Hash(#[from] HashError),

  #[error("{0}")]
  ValueObject(#[from] ValueObjectError),
}

impl AuthError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      AuthError::ValueObject(_) => ErrorKind::InvalidInput,
      AuthError::EmailAlreadyExists => ErrorKind::DuplicateEmail,
      AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
      AuthError::Repository(_) | AuthError::Hash(_) => ErrorKind::Internal,
    }
  }
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

/// Token signing and verification errors
#[derive(Debug, Error)]
pub enum TokenError {
  #[error("Signing key is empty")]
  InvalidKey,

  #[error("Failed to sign token: {0}")]
  SigningFailed(String),

  #[error("Token has expired")]
  Expired,

  #[error("Invalid token: {0}")]
  Invalid(String),
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<argon2::password_hash::Error> for HashError {
  fn from(error: argon2::password_hash::Error) -> Self {
    use argon2::password_hash::Error;
    match error {
      Error::PhcStringField | Error::PhcStringTrailingData => HashError::InvalidFormat,
      _ => HashError::HashingFailed(error.to_string()),
    }
  }
}
