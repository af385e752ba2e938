use crate::{
  error::*,
  guard::{decide_snapshot, GuardDecision},
  provider::AuthProvider,
  session::SessionResolver,
  subscription::Subscription,
};
use libcommon::AuthUser;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
/// What protected consumers see of the session
pub struct AuthSnapshot {
  pub user: Option<AuthUser>,
  pub is_admin: bool,
  pub loading: bool,
}

impl Default for AuthSnapshot {
  fn default() -> Self {
    Self {
      user: None,
      is_admin: false,
      loading: true,
    }
  }
}

/// Process-side auth context kept in sync with the resolver's transitions.
///
/// Starts in the loading state. On every transition to a signed-in identity the admin claim is
/// resolved before the snapshot is published, so consumers go straight from "loading" to the
/// final decision.
pub struct AuthState<P>
where
  P: AuthProvider,
{
  resolver: Arc<SessionResolver<P>>,
  snapshot_tx: Arc<watch::Sender<AuthSnapshot>>,
  _subscription: Subscription,
}

impl<P> AuthState<P>
where
  P: AuthProvider + 'static,
{
  pub fn attach(resolver: Arc<SessionResolver<P>>) -> Self {
    let (snapshot_tx, _) = watch::channel(AuthSnapshot::default());
    let snapshot_tx = Arc::new(snapshot_tx);

    let listener_resolver = resolver.clone();
    let listener_tx = snapshot_tx.clone();
    let subscription = resolver.on_auth_state_change(move |identity| {
      let resolver = listener_resolver.clone();
      let tx = listener_tx.clone();
      async move {
        let next = match identity {
          Some(user) => {
            let is_admin = resolver.check_admin(false).await;
            AuthSnapshot {
              user: Some(user),
              is_admin,
              loading: false,
            }
          }
          None => AuthSnapshot {
            user: None,
            is_admin: false,
            loading: false,
          },
        };
        tx.send_replace(next);
      }
    });

    Self {
      resolver,
      snapshot_tx,
      _subscription: subscription,
    }
  }

  pub fn snapshot(&self) -> AuthSnapshot {
    self.snapshot_tx.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
    self.snapshot_tx.subscribe()
  }

  /// Wait for the first settled snapshot
  pub async fn wait_until_loaded(&self) -> AuthSnapshot {
    let mut rx = self.subscribe();
    let loaded = rx.wait_for(|s| !s.loading).await.map(|s| s.clone());
    loaded.unwrap_or_else(|_| self.snapshot())
  }

  /// Re-resolve the admin claim of the open session and publish the result.
  /// Used where a protected resource is about to be fetched.
  pub async fn recheck_admin(&self, force_refresh: bool) -> bool {
    let is_admin = self.resolver.check_admin(force_refresh).await;
    self.snapshot_tx.send_modify(|s| s.is_admin = s.user.is_some() && is_admin);
    is_admin
  }

  pub fn guard(&self) -> GuardDecision {
    decide_snapshot(&self.snapshot())
  }

  pub async fn logout(&self) -> AuthResult<()> {
    let res = self.resolver.logout().await;
    self.snapshot_tx.send_modify(|s| {
      s.user = None;
      s.is_admin = false;
    });
    res
  }
}
