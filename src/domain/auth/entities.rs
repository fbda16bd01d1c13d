use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User entity as held by the credential store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  /// Identifier assigned by the store on creation
  pub id: i64,
  /// User's email address (unique, lowercase)
  pub email: String,
  /// Argon2id PHC string, never the plaintext
  pub password_hash: String,
}

impl User {
  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(id: i64, email: String, password_hash: String) -> Self {
    Self {
      id,
      email,
      password_hash,
    }
  }
}

/// Client application that tokens are issued for
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Application {
  pub id: i32,
  pub name: String,
  /// Per-application token signing secret
  pub secret: String,
}

impl Application {
  pub fn new(id: i32, name: impl Into<String>, secret: impl Into<String>) -> Self {
    Self {
      id,
      name: name.into(),
      secret: secret.into(),
    }
  }
}

// Keep the signing secret out of logs
impl fmt::Debug for Application {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Application")
      .field("id", &self.id)
      .field("name", &self.name)
      .field("secret", &"***")
      .finish()
  }
}

/// Signed access token handed back to the caller
#[derive(Clone)]
pub struct IssuedToken {
  pub token: String,
  pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for IssuedToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("IssuedToken")
      .field("token", &"***")
      .field("expires_at", &self.expires_at)
      .finish()
  }
}
