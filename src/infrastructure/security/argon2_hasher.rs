use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::HashError;
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Argon2id password hasher implementation
///
/// Uses the Argon2id algorithm with fixed parameters:
/// - Memory cost: 19 MiB (19456 KiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 thread
///
/// Hashing and verification are CPU bound and run on the blocking pool so
/// they never stall the async workers.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  pub const MEMORY_COST_KIB: u32 = 19456;
  pub const TIME_COST: u32 = 2;
  pub const PARALLELISM: u32 = 1;

  /// Creates a new Argon2PasswordHasher with the documented parameters
  pub fn new() -> Result<Self, HashError> {
    let params = Params::new(
      Self::MEMORY_COST_KIB,
      Self::TIME_COST,
      Self::PARALLELISM,
      Some(32),
    )
    .map_err(|e| HashError::HashingFailed(format!("Failed to create Argon2 params: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    Ok(Self { argon2 })
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, HashError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();

    let hash = tokio::task::spawn_blocking(move || {
      let salt = SaltString::generate(&mut rand::rngs::OsRng);
      argon2
        .hash_password(password.as_str().as_bytes(), &salt)
        .map(|hash| hash.to_string())
    })
    .await
    .map_err(|e| HashError::HashingFailed(format!("hashing task aborted: {}", e)))?
    .map_err(HashError::from)?;

    PasswordHash::from_hash(hash).map_err(|_| HashError::InvalidFormat)
  }

  /// Verifies a plain text password against a hashed password
  ///
  /// argon2's `verify_password` compares digests in constant time.
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, HashError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();
    let hashed_password = hashed_password.as_str().to_owned();

    tokio::task::spawn_blocking(move || {
      let parsed_hash = Argon2PasswordHash::new(&hashed_password).map_err(|_| HashError::InvalidFormat)?;

      match argon2.verify_password(password.as_str().as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashError::VerificationFailed(e.to_string())),
      }
    })
    .await
    .map_err(|e| HashError::VerificationFailed(format!("verification task aborted: {}", e)))?
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_hash_password() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("test_password_123").unwrap();

    let hash = hasher.hash(&password).await.unwrap();

    assert!(hash.as_str().starts_with("$argon2id$"));
    assert_ne!(hash.as_str(), password.as_str());
    assert!(!hash.as_str().contains(password.as_str()));
  }

  #[tokio::test]
  async fn test_verify_correct_password() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("pw1").unwrap();

    let hash = hasher.hash(&password).await.unwrap();

    assert!(hasher.verify(&password, &hash).await.unwrap());
  }

  #[tokio::test]
  async fn test_verify_incorrect_password() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("pw1").unwrap();

    let hash = hasher.hash(&password).await.unwrap();

    for other in ["pw2", "PW1", "pw1 ", "p"] {
      let other = Password::new(other).unwrap();
      assert!(!hasher.verify(&other, &hash).await.unwrap());
    }
  }

  #[tokio::test]
  async fn test_hash_produces_different_salts() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("test_password_123").unwrap();

    let hash1 = hasher.hash(&password).await.unwrap();
    let hash2 = hasher.hash(&password).await.unwrap();

    assert_ne!(hash1.as_str(), hash2.as_str());
    assert!(hasher.verify(&password, &hash1).await.unwrap());
    assert!(hasher.verify(&password, &hash2).await.unwrap());
  }

  #[tokio::test]
  async fn test_argon2_parameters() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("test_password_123").unwrap();

    let hash = hasher.hash(&password).await.unwrap();
    let parsed = Argon2PasswordHash::new(hash.as_str()).unwrap();

    assert_eq!(parsed.version, Some(Version::V0x13 as u32));
    assert_eq!(
      parsed.params.get_decimal("m"),
      Some(Argon2PasswordHasher::MEMORY_COST_KIB)
    );
    assert_eq!(
      parsed.params.get_decimal("t"),
      Some(Argon2PasswordHasher::TIME_COST)
    );
  }
}
