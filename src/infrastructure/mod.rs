//! Infrastructure layer
//!
//! Adapters for the domain ports: PostgreSQL repositories, the listing cache
//! backends, the credentials sign-in provider and password hashing, plus
//! configuration loading.

pub mod auth;
pub mod cache;
pub mod config;
pub mod persistence;
pub mod security;
