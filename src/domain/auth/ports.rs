use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use uuid::Uuid;

use super::entities::{Session, SessionGrant, User};
use super::errors::{AuthError, SignInError};
use super::value_objects::{Password, PasswordHash};

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user in the repository
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  /// Finds a user by their (normalized) email address
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
}

/// Repository trait for session persistence operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
  async fn create(&self, session: Session) -> Result<Session, AuthError>;

  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError>;

  /// Deletes the session with the given token hash, if any
  async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), AuthError>;
}

/// Produces storable password hashes. Verification lives on [`PasswordHash`].
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;
}

/// Raw sign-in form data
#[derive(Clone, Default, Deserialize)]
pub struct CredentialsForm {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
  /// Local path to continue to after signing in
  #[serde(rename = "redirectTo", default)]
  pub redirect_to: Option<String>,
  /// Checkbox; present when ticked
  #[serde(default)]
  pub remember: Option<String>,
}

impl CredentialsForm {
  pub fn remember_me(&self) -> bool {
    self.remember.is_some()
  }
}

impl fmt::Debug for CredentialsForm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CredentialsForm")
      .field("email", &self.email)
      .field("password", &"***")
      .field("redirect_to", &self.redirect_to)
      .field("remember", &self.remember)
      .finish()
  }
}

/// External authentication provider
///
/// Verifies credentials for the named strategy and, on success, establishes a
/// session. Failures are either a recognised [`AuthErrorKind`] or an opaque
/// cause the caller must propagate.
///
/// [`AuthErrorKind`]: super::errors::AuthErrorKind
#[async_trait]
pub trait AuthProvider: Send + Sync {
  async fn sign_in(
    &self,
    strategy: &str,
    form: &CredentialsForm,
  ) -> Result<SessionGrant, SignInError>;
}
