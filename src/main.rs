use anyhow::Context;

use sso::app::Application;
use sso::infrastructure::{config::Config, logging};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  let config = Config::load().context("failed to load configuration")?;

  logging::init(config.env).context("failed to initialize logging")?;

  tracing::info!(env = ?config.env, "starting sso");
  tracing::debug!(?config, "loaded configuration");

  let application = Application::build(config).await?;
  application.run_until_stopped().await?;

  tracing::info!("sso stopped");
  Ok(())
}
