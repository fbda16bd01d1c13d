use async_trait::async_trait;
use chrono::Duration;

use super::entities::{Application, IssuedToken, User};
use super::errors::{HashError, RepositoryError, TokenError};
use super::value_objects::{ApplicationId, Email, Password, PasswordHash};

/// Repository trait for user credential persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Persists a new user and returns it with its store-assigned id.
  /// Fails with `RepositoryError::DuplicateKey` when the email is taken.
  async fn save(&self, email: &Email, password_hash: &PasswordHash)
  -> Result<User, RepositoryError>;

  /// Finds a user by email. Fails with `RepositoryError::NotFound` when absent.
  async fn find_by_email(&self, email: &Email) -> Result<User, RepositoryError>;
}

/// Repository trait for client application lookup
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
  /// Finds an application by id. Fails with `RepositoryError::NotFound` when absent.
  async fn find_by_id(&self, id: ApplicationId) -> Result<Application, RepositoryError>;

  /// Inserts or replaces an application record (provisioning only)
  async fn upsert(&self, application: &Application) -> Result<(), RepositoryError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password with a fresh random salt
  async fn hash(&self, password: &Password) -> Result<PasswordHash, HashError>;

  /// Verifies a plain text password against a hashed password
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, HashError>;
}

/// Builds signed access tokens. Implementations must be stateless.
pub trait TokenIssuer: Send + Sync {
  fn issue(
    &self,
    user: &User,
    application: &Application,
    ttl: Duration,
  ) -> Result<IssuedToken, TokenError>;
}
