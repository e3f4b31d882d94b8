pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Session, SessionGrant, User};
pub use errors::{AuthError, AuthErrorKind, RepositoryError, SignInError};
pub use ports::{
  AuthProvider, CredentialsForm, PasswordHasher, SessionRepository, UserRepository,
};
pub use services::{AuthService, AuthServiceConfig};
