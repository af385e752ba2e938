use crate::{
  constants::SESSION_TOKEN_DURATION_MINS,
  log::*,
  secret::Password,
  table::SqliteUserTable,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use libclient::AuthProvider;
use libcommon::{
  user_fields::{Email, Field, TryNewField},
  AuthUser, CustomClaims, ProviderError, UserRecord, CODE_INVALID_EMAIL, CODE_WRONG_PASSWORD,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
/// Session token with the claims snapshot taken when it was issued
struct SessionToken {
  id: String,
  issued_at: DateTime<Utc>,
  expires_at: DateTime<Utc>,
  claims: CustomClaims,
}

impl SessionToken {
  fn issue(record: &UserRecord, lifetime: Duration) -> Self {
    let issued_at = Utc::now();
    Self {
      id: Uuid::new_v4().to_string(),
      issued_at,
      expires_at: issued_at + lifetime,
      claims: record.custom_claims.clone(),
    }
  }
  fn is_expired(&self) -> bool {
    Utc::now() >= self.expires_at
  }
}

struct LocalSession {
  user: AuthUser,
  token: SessionToken,
}

/// End-user provider over the local identity store.
/// Holds one in-memory session; claims in the token only change when the token is re-issued.
pub struct LocalAuthProvider {
  users: SqliteUserTable,
  session: RwLock<Option<LocalSession>>,
  token_lifetime: Duration,
}

impl LocalAuthProvider {
  pub fn new(users: SqliteUserTable) -> Self {
    Self::with_token_lifetime(users, Duration::minutes(SESSION_TOKEN_DURATION_MINS))
  }

  pub fn with_token_lifetime(users: SqliteUserTable, token_lifetime: Duration) -> Self {
    Self {
      users,
      session: RwLock::new(None),
      token_lifetime,
    }
  }

  async fn reissue(&self, session: &mut LocalSession) -> Result<(), ProviderError> {
    let record = self
      .users
      .find_user_by_uid(&session.user.uid)
      .await?
      .ok_or_else(|| ProviderError::user_not_found(session.user.email.as_str()))?;
    session.user = AuthUser::from(&record);
    session.token = SessionToken::issue(&record, self.token_lifetime);
    debug!(
      "Token {} re-issued for {} at {}",
      session.token.id, session.user.email, session.token.issued_at
    );
    Ok(())
  }

  async fn claims(&self, force: bool) -> Result<CustomClaims, ProviderError> {
    let mut lock = self.session.write().await;
    let Some(session) = lock.as_mut() else {
      return Err(ProviderError::no_current_user());
    };
    if force || session.token.is_expired() {
      self.reissue(session).await?;
    }
    Ok(session.token.claims.clone())
  }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
  async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthUser, ProviderError> {
    let email = Email::new(email).map_err(|_| ProviderError::new(CODE_INVALID_EMAIL, "The email address is badly formatted."))?;
    let wrong_password = || ProviderError::new(CODE_WRONG_PASSWORD, "The password is invalid.");

    let Some((record, encoded_hash)) = self.users.find_credential(&email).await? else {
      return Err(ProviderError::user_not_found(email.as_str()));
    };
    let password = Password::new(password).map_err(|_| wrong_password())?;
    let matched = password
      .matches(&encoded_hash)
      .map_err(|e| ProviderError::internal(format!("Password verification failed: {e}")))?;
    if !matched {
      return Err(wrong_password());
    }

    let user = AuthUser::from(&record);
    let token = SessionToken::issue(&record, self.token_lifetime);
    let mut lock = self.session.write().await;
    lock.replace(LocalSession {
      user: user.clone(),
      token,
    });
    info!("{} signed in", user.email);
    Ok(user)
  }

  async fn id_token_claims(&self) -> Result<CustomClaims, ProviderError> {
    self.claims(false).await
  }

  async fn refresh_token(&self, force: bool) -> Result<CustomClaims, ProviderError> {
    self.claims(force).await
  }

  async fn sign_out(&self) -> Result<(), ProviderError> {
    if let Some(session) = self.session.write().await.take() {
      info!("{} signed out", session.user.email);
    }
    Ok(())
  }

  async fn current_user(&self) -> Option<AuthUser> {
    self.session.read().await.as_ref().map(|s| s.user.clone())
  }
}
