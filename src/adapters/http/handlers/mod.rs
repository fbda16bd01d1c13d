pub mod auth;
pub mod health;

use std::future::Future;
use std::time::Duration;

use crate::adapters::http::errors::ApiError;

/// Upper bound on the time a single request may spend in the core
#[derive(Debug, Clone, Copy)]
pub struct RequestDeadline(pub Duration);

impl RequestDeadline {
  pub fn from_secs(secs: u64) -> Self {
    Self(Duration::from_secs(secs))
  }
}

/// Runs `work` under the request deadline.
///
/// When the deadline elapses the work is dropped and the caller gets
/// `ApiError::DeadlineExceeded`.
pub async fn with_deadline<T, F>(deadline: RequestDeadline, work: F) -> Result<T, ApiError>
where
  F: Future<Output = Result<T, ApiError>>,
{
  match tokio::time::timeout(deadline.0, work).await {
    Ok(result) => result,
    Err(_) => {
      tracing::warn!(deadline_ms = deadline.0.as_millis() as u64, "request deadline exceeded");
      Err(ApiError::DeadlineExceeded)
    }
  }
}
