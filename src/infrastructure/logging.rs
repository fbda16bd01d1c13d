use tracing_subscriber::{
  EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

use super::config::RunEnv;

const DEFAULT_FILTER: &str = "sso=debug,actix_web=info";

/// Installs the global tracing subscriber.
///
/// `local` gets human-readable output; `dev` and `prod` emit JSON lines.
/// `RUST_LOG` overrides the default filter.
pub fn init(env: RunEnv) -> Result<(), TryInitError> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
  let local = env == RunEnv::Local;

  tracing_subscriber::registry()
    .with(filter)
    .with(local.then(|| fmt::layer().pretty()))
    .with((!local).then(|| fmt::layer().json().with_current_span(true)))
    .try_init()
}
