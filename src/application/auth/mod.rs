//! Authentication use cases
//!
//! Signing in goes through the [`AuthProvider`] port; session teardown talks
//! to the domain auth service directly. Users are provisioned at startup.
//!
//! [`AuthProvider`]: crate::domain::auth::AuthProvider

mod authenticate;
mod logout_user;
mod register_user;

pub use authenticate::{
  AuthenticateCommand, AuthenticateOutcome, AuthenticateUseCase, CREDENTIALS_STRATEGY,
  GENERIC_AUTH_MESSAGE, INVALID_CREDENTIALS_MESSAGE,
};
pub use logout_user::LogoutUserUseCase;
pub use register_user::{RegisterUserCommand, RegisterUserUseCase};
