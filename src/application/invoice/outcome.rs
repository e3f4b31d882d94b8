use serde::Serialize;

use crate::domain::invoice::FieldErrors;

/// State handed back to the form after a failed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
  #[serde(skip_serializing_if = "FieldErrors::is_empty")]
  pub errors: FieldErrors,
  pub message: Option<String>,
}

impl FormState {
  pub fn with_message(message: impl Into<String>) -> Self {
    Self {
      errors: FieldErrors::new(),
      message: Some(message.into()),
    }
  }
}

/// Result of a validated write. Navigation is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
  /// Written and the listing invalidated; continue at this path
  PersistedAndRedirect(String),
  /// Input rejected before any write
  ValidationFailed(FormState),
  /// The write failed; generic message only
  PersistenceFailed(String),
}

impl ActionOutcome {
  pub(crate) fn validation_failed(errors: FieldErrors, message: &str) -> Self {
    ActionOutcome::ValidationFailed(FormState {
      errors,
      message: Some(message.to_string()),
    })
  }

  /// The state to re-render the form with, if the action failed.
  pub fn form_state(&self) -> Option<FormState> {
    match self {
      ActionOutcome::PersistedAndRedirect(_) => None,
      ActionOutcome::ValidationFailed(state) => Some(state.clone()),
      ActionOutcome::PersistenceFailed(message) => Some(FormState::with_message(message.as_str())),
    }
  }
}
