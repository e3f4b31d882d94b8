use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::auth::value_objects::{Email, Password, PasswordHash};
use crate::domain::auth::{
  AuthErrorKind, AuthProvider, AuthService, CredentialsForm, SessionGrant, SignInError,
  UserRepository,
};

/// Email and password sign-in against the users table.
///
/// Only the `credentials` strategy is offered. A session is opened through
/// [`AuthService`] once the password checks out.
pub struct CredentialsAuthProvider {
  user_repo: Arc<dyn UserRepository>,
  auth_service: Arc<AuthService>,
}

impl CredentialsAuthProvider {
  pub const STRATEGY: &'static str = "credentials";

  pub fn new(user_repo: Arc<dyn UserRepository>, auth_service: Arc<AuthService>) -> Self {
    Self {
      user_repo,
      auth_service,
    }
  }
}

#[async_trait]
impl AuthProvider for CredentialsAuthProvider {
  async fn sign_in(
    &self,
    strategy: &str,
    form: &CredentialsForm,
  ) -> Result<SessionGrant, SignInError> {
    if strategy != Self::STRATEGY {
      tracing::error!("Unsupported sign-in strategy: {}", strategy);
      return Err(SignInError::Known(AuthErrorKind::Configuration));
    }

    let credentials = (
      Email::new(form.email.as_str()),
      Password::new(form.password.as_str()),
    );
    let (email, password) = match credentials {
      (Ok(email), Ok(password)) => (email, password),
      _ => return Err(SignInError::Known(AuthErrorKind::CredentialsSignin)),
    };

    let user = self
      .user_repo
      .find_by_email(email.as_str())
      .await
      .map_err(|e| {
        tracing::error!("Failed to look up user: {}", e);
        SignInError::Known(AuthErrorKind::CallbackRouteError)
      })?
      .ok_or(SignInError::Known(AuthErrorKind::CredentialsSignin))?;

    let verified = PasswordHash::from_hash(user.password_hash.as_str())
      .and_then(|hash| hash.verify(&password))
      .map_err(|e| {
        tracing::error!("Stored password hash for user {} is unusable: {}", user.id, e);
        SignInError::Known(AuthErrorKind::CallbackRouteError)
      })?;

    if !verified {
      return Err(SignInError::Known(AuthErrorKind::CredentialsSignin));
    }

    let grant = self
      .auth_service
      .start_session(user.id, form.remember_me())
      .await
      .context("Failed to start session")?;

    tracing::info!("User {} signed in", user.id);
    Ok(grant)
  }
}
