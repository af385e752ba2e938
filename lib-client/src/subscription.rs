use crate::log::*;
use libcommon::AuthUser;
use std::future::Future;
use tokio::{sync::mpsc, task::JoinHandle};

/// Handle of a registered auth-state listener. Dropping it unsubscribes as well.
#[derive(Debug)]
pub struct Subscription {
  handle: JoinHandle<()>,
}

impl Subscription {
  /// Stop delivering transitions to the listener
  pub fn unsubscribe(self) {
    // Drop aborts the listener task
  }
}

impl Drop for Subscription {
  fn drop(&mut self) {
    self.handle.abort();
  }
}

/// Spawn a task delivering every queued identity to `callback`, in queue order.
/// Invocations are awaited one by one so a listener never runs concurrently with itself, and
/// transitions published while a callback runs wait in the queue instead of being coalesced.
pub(crate) fn spawn_listener<F, Fut>(mut rx: mpsc::UnboundedReceiver<Option<AuthUser>>, callback: F) -> Subscription
where
  F: Fn(Option<AuthUser>) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = ()> + Send + 'static,
{
  let handle = tokio::spawn(async move {
    while let Some(identity) = rx.recv().await {
      callback(identity).await;
    }
    debug!("auth state queue closed, listener finished");
  });
  Subscription { handle }
}
