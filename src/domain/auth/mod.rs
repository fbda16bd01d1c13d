pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{Application, IssuedToken, User};
pub use errors::{AuthError, ErrorKind, HashError, RepositoryError, TokenError};
pub use services::{AuthService, AuthServiceConfig};
pub use value_objects::{ApplicationId, Email, Password, PasswordHash, ValueObjectError};
