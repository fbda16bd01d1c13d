pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{ErrorResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use errors::{ApiError, AuthErrorKind};
pub use handlers::RequestDeadline;
pub use handlers::auth::{login_handler, register_handler};
pub use middleware::{CatchPanicMiddleware, RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{configure_auth_routes, configure_health_routes};
