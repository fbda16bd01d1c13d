//! HS256 JWT access tokens signed with the owning application's secret.

use chrono::{DateTime, Duration, SubsecRound, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::auth::entities::{Application, IssuedToken, User};
use crate::domain::auth::errors::TokenError;
use crate::domain::auth::ports::TokenIssuer;

/// Claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
  /// User id
  pub uid: i64,
  pub email: String,
  /// Application the token is scoped to
  pub app_id: i32,
  /// Issued-at (Unix timestamp)
  pub iat: i64,
  /// Expiration (Unix timestamp)
  pub exp: i64,
}

impl TokenClaims {
  pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
    at.timestamp() > self.exp
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JwtTokenIssuer;

impl JwtTokenIssuer {
  pub fn new() -> Self {
    Self
  }

  /// Issues a token as if it had been signed at `issued_at`.
  pub fn issue_at(
    &self,
    user: &User,
    application: &Application,
    ttl: Duration,
    issued_at: DateTime<Utc>,
  ) -> Result<IssuedToken, TokenError> {
    if application.secret.is_empty() {
      return Err(TokenError::InvalidKey);
    }

    // Claims carry whole seconds; keep the reported expiry identical to `exp`
    let issued_at = issued_at.trunc_subsecs(0);
    let expires_at = issued_at + ttl;
    let claims = TokenClaims {
      uid: user.id,
      email: user.email.clone(),
      app_id: application.id,
      iat: issued_at.timestamp(),
      exp: expires_at.timestamp(),
    };

    let key = EncodingKey::from_secret(application.secret.as_bytes());
    let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
      .map_err(|e| TokenError::SigningFailed(e.to_string()))?;

    Ok(IssuedToken { token, expires_at })
  }

  /// Checks the signature against `secret` and rejects expired tokens with
  /// no clock leeway.
  pub fn verify(&self, token: &str, secret: &str) -> Result<TokenClaims, TokenError> {
    if secret.is_empty() {
      return Err(TokenError::InvalidKey);
    }

    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    jsonwebtoken::decode::<TokenClaims>(token, &key, &validation)
      .map(|data| data.claims)
      .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
      })
  }

  /// Expiry instant of a claim set
  pub fn expires_at(claims: &TokenClaims) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(claims.exp, 0).single()
  }
}

impl TokenIssuer for JwtTokenIssuer {
  fn issue(
    &self,
    user: &User,
    application: &Application,
    ttl: Duration,
  ) -> Result<IssuedToken, TokenError> {
    self.issue_at(user, application, ttl, Utc::now())
  }
}
