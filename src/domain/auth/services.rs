use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Session, SessionGrant, User};
use super::errors::AuthError;
use super::ports::{SessionRepository, UserRepository};
use super::value_objects::SessionToken;

/// Session lifetimes
#[derive(Debug, Clone, Copy)]
pub struct AuthServiceConfig {
  pub session_ttl_seconds: i64,
  pub remember_me_ttl_seconds: i64,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      session_ttl_seconds: 24 * 60 * 60,
      remember_me_ttl_seconds: 30 * 24 * 60 * 60,
    }
  }
}

/// Session management for signed-in users
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  session_repo: Arc<dyn SessionRepository>,
  config: AuthServiceConfig,
}

impl AuthService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      session_repo,
      config,
    }
  }

  /// Opens a session for an already verified user
  ///
  /// # Errors
  /// Returns `AuthError::Repository` if the session cannot be stored
  pub async fn start_session(
    &self,
    user_id: Uuid,
    remember_me: bool,
  ) -> Result<SessionGrant, AuthError> {
    let token = SessionToken::generate();

    let ttl = if remember_me {
      self.config.remember_me_ttl_seconds
    } else {
      self.config.session_ttl_seconds
    };

    let session = Session::with_duration(
      user_id,
      token.hash().into_inner(),
      Duration::seconds(ttl),
    );
    let session = self.session_repo.create(session).await?;

    Ok(SessionGrant {
      token,
      expires_at: session.expires_at,
    })
  }

  /// Validates a session token and returns the associated user
  ///
  /// # Errors
  /// Returns `AuthError::InvalidSession` if session is unknown or expired
  pub async fn validate_session(&self, token: &SessionToken) -> Result<User, AuthError> {
    let token_hash = token.hash();

    let session = self
      .session_repo
      .find_by_token_hash(token_hash.as_str())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    if session.is_expired() {
      self
        .session_repo
        .delete_by_token_hash(token_hash.as_str())
        .await?;
      return Err(AuthError::InvalidSession);
    }

    self
      .user_repo
      .find_by_id(session.user_id)
      .await?
      .ok_or(AuthError::UserNotFound)
  }

  /// Ends the session behind `token`. Unknown tokens are ignored.
  pub async fn logout(&self, token: &SessionToken) -> Result<(), AuthError> {
    self
      .session_repo
      .delete_by_token_hash(token.hash().as_str())
      .await
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use async_trait::async_trait;
  use std::sync::Mutex;

  /// In-memory user and session store for auth tests
  #[derive(Default)]
  pub(crate) struct MemoryAuthStore {
    pub users: Mutex<Vec<User>>,
    pub sessions: Mutex<Vec<Session>>,
  }

  #[async_trait]
  impl UserRepository for MemoryAuthStore {
    async fn create(&self, user: User) -> Result<User, AuthError> {
      self.users.lock().unwrap().push(user.clone());
      Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
      Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
      Ok(
        self
          .users
          .lock()
          .unwrap()
          .iter()
          .find(|u| u.email == email)
          .cloned(),
      )
    }
  }

  #[async_trait]
  impl SessionRepository for MemoryAuthStore {
    async fn create(&self, session: Session) -> Result<Session, AuthError> {
      self.sessions.lock().unwrap().push(session.clone());
      Ok(session)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError> {
      Ok(
        self
          .sessions
          .lock()
          .unwrap()
          .iter()
          .find(|s| s.session_token == token_hash)
          .cloned(),
      )
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), AuthError> {
      self
        .sessions
        .lock()
        .unwrap()
        .retain(|s| s.session_token != token_hash);
      Ok(())
    }
  }

  fn service(store: &Arc<MemoryAuthStore>) -> AuthService {
    AuthService::new(store.clone(), store.clone(), AuthServiceConfig::default())
  }

  #[tokio::test]
  async fn test_session_round_trip() {
    let store = Arc::new(MemoryAuthStore::default());
    let user = User::new(
      "User".to_string(),
      "user@nextmail.com".to_string(),
      "hash".to_string(),
    );
    store.users.lock().unwrap().push(user.clone());

    let auth = service(&store);
    let grant = auth.start_session(user.id, false).await.unwrap();

    // Only the hash is stored
    let stored = store.sessions.lock().unwrap()[0].session_token.clone();
    assert_ne!(stored, grant.token.as_str());
    assert_eq!(stored, grant.token.hash().into_inner());

    let found = auth.validate_session(&grant.token).await.unwrap();
    assert_eq!(found.id, user.id);

    auth.logout(&grant.token).await.unwrap();
    assert!(matches!(
      auth.validate_session(&grant.token).await,
      Err(AuthError::InvalidSession)
    ));
  }

  #[tokio::test]
  async fn test_expired_session_is_removed() {
    let store = Arc::new(MemoryAuthStore::default());
    let token = SessionToken::generate();
    store.sessions.lock().unwrap().push(Session::with_duration(
      Uuid::new_v4(),
      token.hash().into_inner(),
      Duration::seconds(-5),
    ));

    let auth = service(&store);
    assert!(matches!(
      auth.validate_session(&token).await,
      Err(AuthError::InvalidSession)
    ));
    assert!(store.sessions.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_remember_me_extends_lifetime() {
    let store = Arc::new(MemoryAuthStore::default());
    let auth = service(&store);

    let short = auth.start_session(Uuid::new_v4(), false).await.unwrap();
    let long = auth.start_session(Uuid::new_v4(), true).await.unwrap();

    assert!(long.expires_at - short.expires_at > Duration::days(20));
  }
}
