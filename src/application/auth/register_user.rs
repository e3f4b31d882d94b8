use std::sync::Arc;

use crate::domain::auth::entities::User;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{PasswordHasher, UserRepository};
use crate::domain::auth::value_objects::{Email, Password};

/// Command for provisioning a dashboard user
#[derive(Clone)]
pub struct RegisterUserCommand {
  pub name: String,
  pub email: String,
  /// Plain text, hashed before storage
  pub password: String,
}

/// Provisions a user unless one with the same email already exists.
///
/// There is no sign-up page; this runs at startup for the configured
/// bootstrap account.
pub struct RegisterUserUseCase {
  user_repo: Arc<dyn UserRepository>,
  hasher: Arc<dyn PasswordHasher>,
}

impl RegisterUserUseCase {
  pub fn new(user_repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
    Self { user_repo, hasher }
  }

  /// Returns the stored user, created or pre-existing
  ///
  /// # Errors
  /// Returns `AuthError` on a malformed email or password, or if the user
  /// store fails
  pub async fn execute(&self, command: RegisterUserCommand) -> Result<User, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;

    if let Some(existing) = self.user_repo.find_by_email(email.as_str()).await? {
      tracing::debug!("User {} already exists", existing.email);
      return Ok(existing);
    }

    let hash = self.hasher.hash(&password).await?;
    let user = self
      .user_repo
      .create(User::new(command.name, email.into_inner(), hash.into_inner()))
      .await?;

    tracing::info!("Registered user {}", user.email);
    Ok(user)
  }
}
