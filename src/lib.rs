//! Invoice dashboard: validated invoice writes, listing and sign-in.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
