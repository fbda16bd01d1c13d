use actix_web::{App, HttpServer, dev::Server, web};
use anyhow::Context;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::http::{
  CatchPanicMiddleware, RequestDeadline, RequestIdMiddleware, configure_auth_routes,
  configure_health_routes,
};
use crate::application::auth::{LoginUserUseCase, RegisterUserUseCase};
use crate::domain::auth::entities::Application as ClientApplication;
use crate::domain::auth::ports::ApplicationRepository;
use crate::domain::auth::services::{AuthService, AuthServiceConfig};
use crate::infrastructure::config::Config;
use crate::infrastructure::persistence::sqlite::{
  self, SqliteApplicationRepository, SqliteUserRepository,
};
use crate::infrastructure::security::{Argon2PasswordHasher, JwtTokenIssuer};

/// A fully wired server bound to its listening socket
pub struct Application {
  port: u16,
  server: Server,
}

impl Application {
  /// Opens storage, provisions configured client applications, wires the
  /// auth service and binds the HTTP listener.
  ///
  /// Binding to port 0 picks a free port; see [`Application::port`].
  pub async fn build(config: Config) -> anyhow::Result<Self> {
    let token_ttl = config.token_ttl().context("invalid token lifetime")?;

    let connect_timeout = Duration::from_secs(config.database.connect_timeout_seconds);
    let pool = tokio::time::timeout(connect_timeout, sqlite::connect(&config.database))
      .await
      .context("timed out connecting to the database")?
      .context("failed to connect to the database")?;

    sqlite::migrate(&pool)
      .await
      .context("failed to apply migrations")?;
    tracing::info!("database ready");

    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let app_repo = Arc::new(SqliteApplicationRepository::new(pool));

    for app in &config.applications {
      app_repo
        .upsert(&ClientApplication::from(app))
        .await
        .with_context(|| format!("failed to provision application {}", app.id))?;
      tracing::info!(app_id = app.id, name = %app.name, "application provisioned");
    }

    let password_hasher =
      Arc::new(Argon2PasswordHasher::new().context("failed to configure password hasher")?);
    let token_issuer = Arc::new(JwtTokenIssuer::new());

    let auth_service = Arc::new(AuthService::new(
      user_repo,
      app_repo,
      password_hasher,
      token_issuer,
      AuthServiceConfig { token_ttl },
    ));

    let register_use_case = Arc::new(RegisterUserUseCase::new(auth_service.clone()));
    let login_use_case = Arc::new(LoginUserUseCase::new(auth_service));
    let deadline = RequestDeadline::from_secs(config.server.request_timeout_seconds);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))
      .with_context(|| {
        format!(
          "failed to bind {}:{}",
          config.server.host, config.server.port
        )
      })?;
    let port = listener.local_addr()?.port();

    let server = HttpServer::new(move || {
      App::new()
        .wrap(CatchPanicMiddleware::new())
        .wrap(RequestIdMiddleware::new())
        .service(web::scope("/api/v1/auth").configure(|cfg| {
          configure_auth_routes(
            cfg,
            register_use_case.clone(),
            login_use_case.clone(),
            deadline,
          )
        }))
        .configure(configure_health_routes)
    })
    .disable_signals()
    .shutdown_timeout(config.server.shutdown_timeout_seconds)
    .listen(listener)
    .context("failed to start HTTP server")?
    .run();

    tracing::info!(host = %config.server.host, port, "server started");

    Ok(Self { port, server })
  }

  pub fn port(&self) -> u16 {
    self.port
  }

  /// Serves until SIGINT or SIGTERM, then drains in-flight requests.
  pub async fn run_until_stopped(self) -> anyhow::Result<()> {
    let handle = self.server.handle();
    let mut server = std::pin::pin!(self.server);

    tokio::select! {
      result = server.as_mut() => {
        return result.context("server stopped unexpectedly");
      }
      signal = shutdown_signal() => {
        tracing::info!(signal, "stopping server");
      }
    }

    handle.stop(true).await;
    server.await.context("server failed during shutdown")?;
    tracing::info!("graceful shutdown complete");

    Ok(())
  }
}

/// Resolves with the name of the first termination signal received
async fn shutdown_signal() -> &'static str {
  let interrupt = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for SIGINT");
      std::future::pending::<()>().await;
    }
    "SIGINT"
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut stream) => {
        stream.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
    "SIGTERM"
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<&'static str>();

  tokio::select! {
    name = interrupt => name,
    name = terminate => name,
  }
}
