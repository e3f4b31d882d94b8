//! Application layer
//!
//! Use cases that run the dashboard's form actions on top of the domain
//! services. Each one returns a value the HTTP layer turns into a response;
//! none of them navigates by itself.

pub mod auth;
pub mod invoice;
