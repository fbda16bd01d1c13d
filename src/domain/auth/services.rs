use chrono::Duration;
use std::sync::Arc;
use tracing::instrument;

use super::entities::{IssuedToken, User};
use super::errors::{AuthError, RepositoryError};
use super::ports::{ApplicationRepository, PasswordHasher, TokenIssuer, UserRepository};
use super::value_objects::{ApplicationId, Email, Password, PasswordHash};

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
  /// Validity window of issued tokens
  pub token_ttl: Duration,
}

/// Authentication service implementing core business logic
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  app_repo: Arc<dyn ApplicationRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_issuer: Arc<dyn TokenIssuer>,
  config: AuthServiceConfig,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    app_repo: Arc<dyn ApplicationRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      app_repo,
      password_hasher,
      token_issuer,
      config,
    }
  }

  /// Registers a new user with email and password
  ///
  /// # Errors
  /// - `AuthError::EmailAlreadyExists` if the email is already registered
  /// - `AuthError::Hash` if the password could not be hashed
  /// - `AuthError::Repository` for any other store failure
  #[instrument(skip(self, password), fields(email = %email))]
  pub async fn register(&self, email: Email, password: Password) -> Result<User, AuthError> {
    tracing::info!("registering new user");

    let password_hash = self.password_hasher.hash(&password).await.map_err(|e| {
      tracing::error!(error = %e, "failed to hash password");
      e
    })?;

    match self.user_repo.save(&email, &password_hash).await {
      Ok(user) => {
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
      }
      Err(RepositoryError::DuplicateKey(_)) => {
        tracing::warn!("email already registered");
        Err(AuthError::EmailAlreadyExists)
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to save user");
        Err(AuthError::Repository(e))
      }
    }
  }

  /// Authenticates a user and issues a token for the given application
  ///
  /// Every failure after input validation is reported as
  /// `AuthError::InvalidCredentials`, so callers cannot tell an unknown email
  /// from a wrong password or an unknown application. The underlying cause is
  /// logged.
  #[instrument(skip(self, password), fields(email = %email, app_id = %app_id))]
  pub async fn login(
    &self,
    email: Email,
    password: Password,
    app_id: ApplicationId,
  ) -> Result<IssuedToken, AuthError> {
    tracing::info!("logging in");

    let user = match self.user_repo.find_by_email(&email).await {
      Ok(user) => user,
      Err(RepositoryError::NotFound) => {
        tracing::warn!("user not found");
        return Err(AuthError::InvalidCredentials);
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to get user");
        return Err(AuthError::InvalidCredentials);
      }
    };

    let stored_hash = PasswordHash::from_hash(user.password_hash.as_str()).map_err(|e| {
      tracing::error!(user_id = user.id, error = %e, "stored password hash is unreadable");
      AuthError::InvalidCredentials
    })?;

    match self.password_hasher.verify(&password, &stored_hash).await {
      Ok(true) => {}
      Ok(false) => {
        tracing::warn!(user_id = user.id, "invalid password");
        return Err(AuthError::InvalidCredentials);
      }
      Err(e) => {
        tracing::error!(user_id = user.id, error = %e, "failed to verify password");
        return Err(AuthError::InvalidCredentials);
      }
    }

    let application = self.app_repo.find_by_id(app_id).await.map_err(|e| {
      tracing::warn!(error = %e, "failed to resolve application");
      AuthError::InvalidCredentials
    })?;

    let token = self
      .token_issuer
      .issue(&user, &application, self.config.token_ttl)
      .map_err(|e| {
        tracing::error!(user_id = user.id, error = %e, "failed to create token");
        AuthError::InvalidCredentials
      })?;

    tracing::info!(user_id = user.id, "logged in");

    Ok(token)
  }
}
