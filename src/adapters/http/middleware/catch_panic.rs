use actix_web::{
  Error, HttpMessage, ResponseError,
  body::MessageBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  error::InternalError,
  http::header::{HeaderName, HeaderValue},
};
use futures_util::{FutureExt, future::LocalBoxFuture};
use std::{
  any::Any,
  future::{Ready, ready},
  panic::AssertUnwindSafe,
  rc::Rc,
};

use crate::adapters::http::errors::ApiError;

use super::request_id::{REQUEST_ID_HEADER, RequestId};

/// Turns a panic anywhere below this middleware into a `500 internal`
/// response instead of tearing down the worker's connection.
///
/// Mount it inside `RequestIdMiddleware` so the error response still
/// carries the request ID.
#[derive(Debug, Clone, Default)]
pub struct CatchPanicMiddleware;

impl CatchPanicMiddleware {
  pub fn new() -> Self {
    Self
  }
}

impl<S, B> Transform<S, ServiceRequest> for CatchPanicMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = CatchPanicMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(CatchPanicMiddlewareService {
      service: Rc::new(service),
    }))
  }
}

pub struct CatchPanicMiddlewareService<S> {
  service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for CatchPanicMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);

    // The router needs sole ownership of the request, so only owned copies
    // of what the panic branch reports may outlive the inner call
    let method = req.method().to_string();
    let path = req.path().to_string();
    let request_id = req.extensions().get::<RequestId>().copied();

    Box::pin(async move {
      // Calling inside the future also catches panics raised while the
      // inner service builds its future
      let outcome = AssertUnwindSafe(async move { service.call(req).await })
        .catch_unwind()
        .await;

      match outcome {
        Ok(result) => result,
        Err(payload) => {
          tracing::error!(
            method = %method,
            path = %path,
            panic = %panic_message(payload.as_ref()),
            "handler panicked"
          );
          Err(panic_error(request_id))
        }
      }
    })
  }
}

/// Generic internal error, tagged with the request ID when one is known
fn panic_error(request_id: Option<RequestId>) -> Error {
  let error = ApiError::Internal("handler panicked".into());
  let mut response = error.error_response();

  if let Some(value) = request_id.and_then(|id| HeaderValue::from_str(&id.to_string()).ok()) {
    response
      .headers_mut()
      .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
  }

  InternalError::from_response(error, response).into()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "non-string panic payload".to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::http::dtos::ErrorResponse;
  use crate::adapters::http::middleware::RequestIdMiddleware;
  use actix_web::{
    App, HttpResponse,
    http::StatusCode,
    test::{self, TestRequest},
    web,
  };

  async fn boom() -> HttpResponse {
    panic!("boom")
  }

  async fn fine() -> HttpResponse {
    HttpResponse::Ok().body("fine")
  }

  async fn named(path: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().body(path.into_inner())
  }

  #[actix_web::test]
  async fn test_routes_resolve_through_middleware() {
    let app = test::init_service(
      App::new()
        .wrap(CatchPanicMiddleware::new())
        .route("/fine", web::get().to(fine))
        .route("/users/{name}", web::get().to(named)),
    )
    .await;

    let resp = test::call_service(&app, TestRequest::get().uri("/fine").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, TestRequest::get().uri("/users/ann").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "ann");
  }

  #[actix_web::test]
  async fn test_panic_becomes_internal_error() {
    let app = test::init_service(
      App::new()
        .wrap(CatchPanicMiddleware::new())
        .route("/boom", web::get().to(boom))
        .route("/fine", web::get().to(fine)),
    )
    .await;

    let resp = app
      .call(TestRequest::get().uri("/boom").to_request())
      .await
      .unwrap_err()
      .error_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.error, "internal");
    assert!(!body.message.contains("boom"));

    // The service keeps answering after a panic
    let resp = test::call_service(&app, TestRequest::get().uri("/fine").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[actix_web::test]
  async fn test_panic_response_carries_request_id() {
    let app = test::init_service(
      App::new()
        .wrap(CatchPanicMiddleware::new())
        .wrap(RequestIdMiddleware::new())
        .route("/boom", web::get().to(boom)),
    )
    .await;

    let supplied = "1b4e28ba-2fa1-11d2-883f-0016d3cca427";
    let resp = app
      .call(
        TestRequest::get()
          .uri("/boom")
          .insert_header((REQUEST_ID_HEADER, supplied))
          .to_request(),
      )
      .await
      .unwrap_err()
      .error_response();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), supplied);
  }

  #[test]
  fn test_panic_message_extraction() {
    let payload: Box<dyn Any + Send> = Box::new("static str");
    assert_eq!(panic_message(payload.as_ref()), "static str");

    let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
    assert_eq!(panic_message(payload.as_ref()), "owned");

    let payload: Box<dyn Any + Send> = Box::new(42u8);
    assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
  }
}
