use std::sync::Arc;

use crate::domain::auth::{AuthErrorKind, AuthProvider, CredentialsForm, SessionGrant, SignInError};

/// Strategy name the dashboard signs in with
pub const CREDENTIALS_STRATEGY: &str = "credentials";

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";
pub const GENERIC_AUTH_MESSAGE: &str = "Something went wrong.";

/// Command for signing in with the credentials form
#[derive(Debug, Clone)]
pub struct AuthenticateCommand {
  /// Message shown by the previous submission of the form, if any. Accepted
  /// for parity with the form action signature and not consulted.
  pub previous_state: Option<String>,
  pub credentials: CredentialsForm,
}

#[derive(Debug, Clone)]
pub enum AuthenticateOutcome {
  /// The provider established a session
  SignedIn(SessionGrant),
  /// A recognised failure, with the message to show on the form
  Failed(&'static str),
}

/// Use case for signing a user in through the authentication provider
pub struct AuthenticateUseCase {
  provider: Arc<dyn AuthProvider>,
}

impl AuthenticateUseCase {
  pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
    Self { provider }
  }

  /// Delegates to the provider and maps recognised failures to form messages.
  ///
  /// # Errors
  /// Failures the authentication layer does not recognise are returned as-is
  /// for the caller's own error handling.
  pub async fn execute(
    &self,
    command: AuthenticateCommand,
  ) -> Result<AuthenticateOutcome, anyhow::Error> {
    match self
      .provider
      .sign_in(CREDENTIALS_STRATEGY, &command.credentials)
      .await
    {
      Ok(grant) => Ok(AuthenticateOutcome::SignedIn(grant)),
      Err(SignInError::Known(AuthErrorKind::CredentialsSignin)) => {
        tracing::info!("Sign-in rejected for {}", command.credentials.email);
        Ok(AuthenticateOutcome::Failed(INVALID_CREDENTIALS_MESSAGE))
      }
      Err(SignInError::Known(kind)) => {
        tracing::warn!("Sign-in failed with {}", kind);
        Ok(AuthenticateOutcome::Failed(GENERIC_AUTH_MESSAGE))
      }
      Err(SignInError::Unknown(cause)) => Err(cause),
    }
  }
}
