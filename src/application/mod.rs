//! Application layer
//!
//! This layer contains use cases that orchestrate domain logic to implement
//! application-specific workflows. Use cases turn raw commands into validated
//! value objects and hand them to the domain service.

pub mod auth;
