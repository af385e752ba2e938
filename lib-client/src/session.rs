use crate::{
  constants::MSG_NOT_AUTHORIZED,
  error::*,
  log::*,
  message::sign_in_failure_message,
  provider::AuthProvider,
  subscription::{spawn_listener, Subscription},
};
use libcommon::{user_fields::Field, AuthUser, CustomClaims, ProviderError};
use std::{
  future::Future,
  sync::{Arc, Mutex as StdMutex, MutexGuard},
};
use tokio::sync::{mpsc, Mutex, RwLock};

#[derive(Debug, Clone, PartialEq)]
/// Lifecycle of the local session
pub enum SessionState {
  Unauthenticated,
  Authenticating,
  /// Signed in, holding the claims snapshot last read from the token
  Authenticated(CustomClaims),
}

/// Last published identity and the transition queue of each subscriber
struct Listeners {
  identity: Option<AuthUser>,
  queues: Vec<mpsc::UnboundedSender<Option<AuthUser>>>,
}

/// Resolves whether the current session holds the admin claim and publishes sign-in/sign-out
/// transitions to listeners.
pub struct SessionResolver<P>
where
  P: AuthProvider,
{
  provider: Arc<P>,
  state: RwLock<SessionState>,
  listeners: StdMutex<Listeners>,
  /// serializes login and logout
  transition_lock: Mutex<()>,
}

impl<P> SessionResolver<P>
where
  P: AuthProvider,
{
  /// Build the resolver, picking up a session the provider may already hold
  pub async fn new(provider: Arc<P>) -> Self {
    let current = provider.current_user().await;
    let state = match &current {
      Some(user) => {
        let claims = match provider.id_token_claims().await {
          Ok(claims) => claims,
          Err(e) => {
            warn!("Failed to read claims of persisted session for {}: {e}", user.email);
            CustomClaims::default()
          }
        };
        SessionState::Authenticated(claims)
      }
      None => SessionState::Unauthenticated,
    };
    Self {
      provider,
      state: RwLock::new(state),
      listeners: StdMutex::new(Listeners {
        identity: current,
        queues: Vec::new(),
      }),
      transition_lock: Mutex::new(()),
    }
  }

  /// Sign in with email and password. Only identities holding the admin claim keep a session:
  /// for anyone else the session is signed out again and `NotAuthorized` is returned.
  pub async fn login(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
    let _lock = self.transition_lock.lock().await;
    self.set_state(SessionState::Authenticating).await;

    let user = match self.provider.sign_in_with_password(email, password).await {
      Ok(user) => user,
      Err(e) => {
        warn!("Sign-in failed for {email}: {e}");
        self.restore_state().await;
        return Err(AuthError::SignInFailed {
          message: sign_in_failure_message(&e),
          code: e.code,
        });
      }
    };

    // cached token first, then one forced refresh before giving up
    let claims = match self.admin_claims_after_sign_in().await {
      Ok(claims) => claims,
      Err(e) => {
        error!("Failed to read claims of {}: {e}", user.email);
        self.tear_down().await;
        return Err(AuthError::Provider(e));
      }
    };

    if !claims.is_admin() {
      info!("{} signed in without admin claim, signing out", user.email);
      self.tear_down().await;
      return Err(AuthError::NotAuthorized {
        message: MSG_NOT_AUTHORIZED.to_string(),
      });
    }

    self.set_state(SessionState::Authenticated(claims)).await;
    self.publish(Some(user.clone()));
    info!("Admin session established for {}", user.email);
    Ok(user)
  }

  async fn admin_claims_after_sign_in(&self) -> Result<CustomClaims, ProviderError> {
    let cached = self.provider.id_token_claims().await?;
    if cached.is_admin() {
      return Ok(cached);
    }
    debug!("admin claim absent from cached token, forcing refresh");
    self.provider.refresh_token(true).await
  }

  /// Admin status of the current session. Reads the cached token unless `force_refresh` is set,
  /// in which case the current server-side claims are fetched first.
  /// Never fails: no session or any provider error yields `false`.
  pub async fn check_admin(&self, force_refresh: bool) -> bool {
    if self.provider.current_user().await.is_none() {
      return false;
    }
    match self.read_admin(force_refresh).await {
      Ok(is_admin) => is_admin,
      Err(e) => {
        error!("Error checking admin claim: {e}");
        false
      }
    }
  }

  async fn read_admin(&self, force_refresh: bool) -> Result<bool, ProviderError> {
    let claims = if force_refresh {
      self.provider.refresh_token(true).await?
    } else {
      self.provider.id_token_claims().await?
    };
    let is_admin = claims.is_admin();
    let mut state = self.state.write().await;
    if let SessionState::Authenticated(snapshot) = &mut *state {
      *snapshot = claims;
    }
    Ok(is_admin)
  }

  /// Register a listener for sign-in/sign-out transitions.
  /// The listener first receives the current identity, then one call per transition, in order.
  pub fn on_auth_state_change<F, Fut>(&self, callback: F) -> Subscription
  where
    F: Fn(Option<AuthUser>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    {
      // current identity is queued under the same lock as later transitions
      let mut listeners = self.listeners();
      let _ = tx.send(listeners.identity.clone());
      listeners.queues.push(tx);
    }
    spawn_listener(rx, callback)
  }

  /// Terminate the session. Local state is cleared even when the provider call fails.
  pub async fn logout(&self) -> AuthResult<()> {
    let _lock = self.transition_lock.lock().await;
    let res = self.provider.sign_out().await;
    self.set_state(SessionState::Unauthenticated).await;
    self.publish(None);
    res.map_err(AuthError::Provider)
  }

  pub async fn current_user(&self) -> Option<AuthUser> {
    self.provider.current_user().await
  }

  pub async fn state(&self) -> SessionState {
    self.state.read().await.clone()
  }

  async fn tear_down(&self) {
    if let Err(e) = self.provider.sign_out().await {
      error!("Failed to sign out rejected session: {e}");
    }
    self.set_state(SessionState::Unauthenticated).await;
    self.publish(None);
  }

  /// Re-sync local state with whatever session the provider still holds
  async fn restore_state(&self) {
    let state = match self.provider.current_user().await {
      Some(_) => match self.provider.id_token_claims().await {
        Ok(claims) => SessionState::Authenticated(claims),
        Err(_) => SessionState::Authenticated(CustomClaims::default()),
      },
      None => SessionState::Unauthenticated,
    };
    self.set_state(state).await;
  }

  async fn set_state(&self, next: SessionState) {
    let mut state = self.state.write().await;
    *state = next;
  }

  fn listeners(&self) -> MutexGuard<'_, Listeners> {
    // the guarded data stays consistent even if a holder panicked
    self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Queue the identity to every listener, only when the signed-in identity actually changes.
  /// Queues of dropped subscriptions are pruned here.
  fn publish(&self, identity: Option<AuthUser>) {
    let mut listeners = self.listeners();
    let changed = match (listeners.identity.as_ref(), identity.as_ref()) {
      (None, None) => false,
      (Some(a), Some(b)) => a.uid.as_str() != b.uid.as_str(),
      _ => true,
    };
    if !changed {
      return;
    }
    listeners.queues.retain(|tx| tx.send(identity.clone()).is_ok());
    listeners.identity = identity;
  }
}
