pub mod auth;

// Re-export auth module for easier access
pub use auth::*;
