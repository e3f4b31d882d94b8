//! Domain layer
//!
//! Entities, value objects, validation rules and the ports the outer layers
//! implement. Nothing here knows about HTTP.

pub mod auth;
pub mod invoice;
