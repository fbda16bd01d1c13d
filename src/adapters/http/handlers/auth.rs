use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
  errors::ApiError,
};
use crate::application::auth::{
  LoginUserCommand, LoginUserUseCase, RegisterUserCommand, RegisterUserUseCase,
};

use super::{RequestDeadline, with_deadline};

/// Handler for user registration
///
/// POST /api/v1/auth/register
/// Body: RegisterRequest (JSON)
/// Response: RegisterResponse (JSON) with status 201
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
  deadline: web::Data<RequestDeadline>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let RegisterRequest { email, password } = request.into_inner();
  let command = RegisterUserCommand { email, password };

  let response = with_deadline(*deadline.get_ref(), async {
    use_case.execute(command).await.map_err(ApiError::from)
  })
  .await?;

  Ok(HttpResponse::Created().json(RegisterResponse {
    user_id: response.user_id,
  }))
}

/// Handler for user login
///
/// POST /api/v1/auth/login
/// Body: LoginRequest (JSON)
/// Response: LoginResponse (JSON) with status 200
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
  deadline: web::Data<RequestDeadline>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let LoginRequest {
    email,
    password,
    app_id,
  } = request.into_inner();
  let command = LoginUserCommand {
    email,
    password,
    app_id,
  };

  let response = with_deadline(*deadline.get_ref(), async {
    use_case.execute(command).await.map_err(ApiError::from)
  })
  .await?;

  Ok(HttpResponse::Ok().json(LoginResponse {
    token: response.token,
    expires_at: response.expires_at,
  }))
}
