//! End-to-end tests of the HTTP facade over in-memory storage, the real
//! Argon2 hasher and the JWT issuer.

use actix_web::{
  App,
  http::StatusCode,
  test::{self, TestRequest},
  web,
};
use serde_json::json;
use std::sync::Arc;

use sso::adapters::http::{
  CatchPanicMiddleware, ErrorResponse, LoginResponse, RegisterResponse, RequestDeadline,
  RequestIdMiddleware, configure_auth_routes, configure_health_routes,
};
use sso::application::auth::{LoginUserUseCase, RegisterUserUseCase};
use sso::domain::auth::{
  entities::Application,
  errors::TokenError,
  ports::ApplicationRepository,
  services::{AuthService, AuthServiceConfig},
};
use sso::infrastructure::persistence::{InMemoryApplicationRepository, InMemoryUserRepository};
use sso::infrastructure::security::{Argon2PasswordHasher, JwtTokenIssuer};

const WEB_SECRET: &str = "web-secret";
const MOBILE_SECRET: &str = "mobile-secret";

async fn use_cases() -> (Arc<RegisterUserUseCase>, Arc<LoginUserUseCase>) {
  let app_repo = Arc::new(InMemoryApplicationRepository::new());
  app_repo
    .upsert(&Application::new(1, "web", WEB_SECRET))
    .await
    .unwrap();
  app_repo
    .upsert(&Application::new(2, "mobile", MOBILE_SECRET))
    .await
    .unwrap();

  let auth_service = Arc::new(AuthService::new(
    Arc::new(InMemoryUserRepository::new()),
    app_repo,
    Arc::new(Argon2PasswordHasher::new().unwrap()),
    Arc::new(JwtTokenIssuer::new()),
    AuthServiceConfig {
      token_ttl: chrono::Duration::hours(1),
    },
  ));

  (
    Arc::new(RegisterUserUseCase::new(auth_service.clone())),
    Arc::new(LoginUserUseCase::new(auth_service)),
  )
}

macro_rules! init_app {
  () => {{
    let (register, login) = use_cases().await;
    test::init_service(
      App::new()
        .wrap(CatchPanicMiddleware::new())
        .wrap(RequestIdMiddleware::new())
        .service(web::scope("/api/v1/auth").configure(|cfg| {
          configure_auth_routes(cfg, register, login, RequestDeadline::from_secs(10))
        }))
        .configure(configure_health_routes),
    )
    .await
  }};
}

fn register(body: serde_json::Value) -> TestRequest {
  TestRequest::post()
    .uri("/api/v1/auth/register")
    .set_json(body)
}

fn login(body: serde_json::Value) -> TestRequest {
  TestRequest::post().uri("/api/v1/auth/login").set_json(body)
}

#[actix_web::test]
async fn test_register_then_duplicate() {
  let app = init_app!();

  let resp = test::call_service(
    &app,
    register(json!({"email": "a@x.com", "password": "pw1"})).to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: RegisterResponse = test::read_body_json(resp).await;
  assert!(body.user_id > 0);

  // Same email, different password
  let resp = test::call_service(
    &app,
    register(json!({"email": "a@x.com", "password": "pw2"})).to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  let body: ErrorResponse = test::read_body_json(resp).await;
  assert_eq!(body.error, "already_exists");
}

#[actix_web::test]
async fn test_login_issues_token_scoped_to_application() {
  let app = init_app!();

  let resp = test::call_service(
    &app,
    register(json!({"email": "b@x.com", "password": "pw1"})).to_request(),
  )
  .await;
  let registered: RegisterResponse = test::read_body_json(resp).await;

  let resp = test::call_service(
    &app,
    login(json!({"email": "b@x.com", "password": "pw1", "app_id": 1})).to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: LoginResponse = test::read_body_json(resp).await;
  assert!(!body.token.is_empty());

  let issuer = JwtTokenIssuer::new();
  let claims = issuer.verify(&body.token, WEB_SECRET).unwrap();
  assert_eq!(claims.uid, registered.user_id);
  assert_eq!(claims.email, "b@x.com");
  assert_eq!(claims.app_id, 1);
  assert_eq!(JwtTokenIssuer::expires_at(&claims), Some(body.expires_at));

  // Another application's secret must not accept it
  assert!(matches!(
    issuer.verify(&body.token, MOBILE_SECRET),
    Err(TokenError::Invalid(_))
  ));
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
  let app = init_app!();

  test::call_service(
    &app,
    register(json!({"email": "b@x.com", "password": "pw1"})).to_request(),
  )
  .await;

  let attempts = [
    json!({"email": "never@x.com", "password": "pw1", "app_id": 1}),
    json!({"email": "b@x.com", "password": "wrong", "app_id": 1}),
    json!({"email": "b@x.com", "password": "pw1", "app_id": 99}),
  ];

  let mut bodies = Vec::new();
  for attempt in attempts {
    let resp = test::call_service(&app, login(attempt).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    bodies.push(test::read_body(resp).await);
  }

  assert_eq!(bodies[0], bodies[1]);
  assert_eq!(bodies[1], bodies[2]);

  let body: ErrorResponse = serde_json::from_slice(&bodies[0]).unwrap();
  assert_eq!(body.error, "invalid_argument");
  assert_eq!(body.message, "invalid email or password");
}

#[actix_web::test]
async fn test_missing_fields_are_invalid_argument() {
  let app = init_app!();

  let cases = [
    register(json!({"password": "pw1"})),
    register(json!({"email": "a@x.com"})),
    login(json!({"email": "a@x.com", "password": "pw1"})),
    login(json!({"email": "", "password": "pw1", "app_id": 1})),
  ];

  for case in cases {
    let resp = test::call_service(&app, case.to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_argument");
  }
}

#[actix_web::test]
async fn test_missing_app_id_is_reported() {
  let app = init_app!();

  let resp = test::call_service(
    &app,
    login(json!({"email": "a@x.com", "password": "pw1"})).to_request(),
  )
  .await;
  let body: ErrorResponse = test::read_body_json(resp).await;

  assert_eq!(body.message, "missing app ID");
}

#[actix_web::test]
async fn test_malformed_email_is_rejected_at_registration() {
  let app = init_app!();

  let resp = test::call_service(
    &app,
    register(json!({"email": "not-an-email", "password": "pw1"})).to_request(),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: ErrorResponse = test::read_body_json(resp).await;
  assert_eq!(body.error, "invalid_argument");
}

#[actix_web::test]
async fn test_error_responses_carry_request_id() {
  let app = init_app!();

  let resp = test::call_service(
    &app,
    login(json!({"email": "never@x.com", "password": "pw1", "app_id": 1})).to_request(),
  )
  .await;

  assert!(resp.headers().contains_key("x-request-id"));
}

#[actix_web::test]
async fn test_health_check() {
  let app = init_app!();

  let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;

  assert_eq!(resp.status(), StatusCode::OK);
}
