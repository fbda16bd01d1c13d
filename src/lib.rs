//! Minimal single sign-on service: user registration, password login and
//! per-application signed access tokens.

pub mod adapters;
pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
