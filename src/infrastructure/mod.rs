//! Infrastructure layer
//!
//! Adapters for the domain ports (SQLite persistence, Argon2 hashing, JWT
//! signing) plus configuration and logging setup.

pub mod config;
pub mod logging;
pub mod persistence;
pub mod security;
