use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::value_objects::SessionToken;

/// Dashboard user
#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  /// Argon2id hash
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn new(name: String, email: String, password_hash: String) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      email,
      password_hash,
      created_at: Utc::now(),
    }
  }
}

/// Session entity representing a signed-in browser
#[derive(Debug, Clone)]
pub struct Session {
  pub id: Uuid,
  pub user_id: Uuid,
  /// SHA-256 hash of the token handed to the browser
  pub session_token: String,
  pub expires_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl Session {
  /// Creates a session that expires `duration` from now
  pub fn with_duration(user_id: Uuid, session_token: String, duration: Duration) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      user_id,
      session_token,
      expires_at: now + duration,
      created_at: now,
    }
  }

  pub fn is_expired(&self) -> bool {
    self.expires_at <= Utc::now()
  }
}

/// What a successful sign-in hands back to the HTTP layer: the raw token for
/// the cookie and when it stops being valid.
#[derive(Debug, Clone)]
pub struct SessionGrant {
  pub token: SessionToken,
  pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_session_expiry() {
    let live = Session::with_duration(Uuid::new_v4(), "hash".to_string(), Duration::hours(1));
    assert!(!live.is_expired());

    let stale = Session::with_duration(Uuid::new_v4(), "hash".to_string(), Duration::seconds(-1));
    assert!(stale.is_expired());
  }
}
