use std::fmt;
use thiserror::Error;

use super::value_objects::ValueObjectError;

/// Session and account errors
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Invalid or expired session")]
  InvalidSession,

  #[error("User not found")]
  UserNotFound,

  #[error("Password hashing failed: {0}")]
  Hashing(String),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Value object error: {0}")]
  ValueObject(#[from] ValueObjectError),
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}

/// Failure kinds the authentication layer recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
  /// Credentials were malformed, unknown or wrong
  CredentialsSignin,
  /// The provider failed while checking the credentials
  CallbackRouteError,
  /// The provider was asked for a strategy it does not offer
  Configuration,
}

impl AuthErrorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      AuthErrorKind::CredentialsSignin => "CredentialsSignin",
      AuthErrorKind::CallbackRouteError => "CallbackRouteError",
      AuthErrorKind::Configuration => "Configuration",
    }
  }
}

impl fmt::Display for AuthErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Error raised by an authentication provider: either a kind the
/// authentication layer recognises, or anything else.
#[derive(Debug, Error)]
pub enum SignInError {
  #[error("Authentication failed: {0}")]
  Known(AuthErrorKind),

  #[error(transparent)]
  Unknown(#[from] anyhow::Error),
}

impl SignInError {
  pub fn kind(&self) -> Option<AuthErrorKind> {
    match self {
      SignInError::Known(kind) => Some(*kind),
      SignInError::Unknown(_) => None,
    }
  }
}
