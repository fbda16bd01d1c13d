use actix_web::{HttpResponse, ResponseError, error::JsonPayloadError, web};
use std::sync::Arc;

use crate::application::auth::{LoginUserUseCase, RegisterUserUseCase};

use super::errors::ApiError;
use super::handlers::RequestDeadline;
use super::handlers::auth::{login_handler, register_handler};
use super::handlers::health::health_check;

/// Largest JSON body accepted by the auth endpoints
const MAX_JSON_PAYLOAD: usize = 16 * 1024;

/// Configure authentication routes
///
/// Mounts the authentication endpoints under the provided scope.
///
/// # Routes
///
/// - POST /register - Register a new user account
/// - POST /login - Exchange credentials for an application token
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use sso::application::auth::*;
/// # use sso::adapters::http::handlers::RequestDeadline;
/// # use sso::adapters::http::routes::configure_auth_routes;
///
/// # fn example(
/// #   register_use_case: Arc<RegisterUserUseCase>,
/// #   login_use_case: Arc<LoginUserUseCase>,
/// # ) {
/// let app = App::new().service(web::scope("/api/v1/auth").configure(|cfg| {
///   configure_auth_routes(
///     cfg,
///     register_use_case,
///     login_use_case,
///     RequestDeadline::from_secs(10),
///   )
/// }));
/// # }
/// ```
pub fn configure_auth_routes(
  cfg: &mut web::ServiceConfig,
  register_use_case: Arc<RegisterUserUseCase>,
  login_use_case: Arc<LoginUserUseCase>,
  deadline: RequestDeadline,
) {
  cfg
    .app_data(web::Data::new(register_use_case))
    .app_data(web::Data::new(login_use_case))
    .app_data(web::Data::new(deadline))
    .app_data(
      web::JsonConfig::default()
        .limit(MAX_JSON_PAYLOAD)
        .error_handler(json_error_handler),
    )
    .route("/register", web::post().to(register_handler))
    .route("/login", web::post().to(login_handler));
}

/// Configure operational routes
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
  cfg.route("/health", web::get().to(health_check));
}

/// Reports malformed bodies in the same shape as every other error
fn json_error_handler(err: JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
  tracing::debug!(error = %err, "rejected request body");
  let response: HttpResponse = ApiError::Validation(format!("malformed request body: {}", err))
    .error_response();
  actix_web::error::InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::http::dtos::ErrorResponse;
  use actix_web::{
    App,
    http::StatusCode,
    test::{self, TestRequest},
  };

  #[actix_web::test]
  async fn test_health_check() {
    let app = test::init_service(App::new().configure(configure_health_routes)).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "OK");
  }

  #[actix_web::test]
  async fn test_malformed_json_is_invalid_argument() {
    async fn echo(body: web::Json<serde_json::Value>) -> HttpResponse {
      HttpResponse::Ok().json(body.into_inner())
    }

    let app = test::init_service(
      App::new().service(
        web::scope("")
          .app_data(web::JsonConfig::default().error_handler(json_error_handler))
          .route("/echo", web::post().to(echo)),
      ),
    )
    .await;

    let req = TestRequest::post()
      .uri("/echo")
      .insert_header(("content-type", "application/json"))
      .set_payload("{not json")
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_argument");
  }
}
