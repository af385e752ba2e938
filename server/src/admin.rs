//! Grant, revoke and list the admin custom claim with service credentials.
//!
//! Each write is a single `set_claims` call on a single user record. Nothing is retried, and
//! concurrent writes to the same user are last-write-wins at the provider.

use crate::{constants::LIST_USERS_PAGE_SIZE, error::*, log::*, table::IdentityAdmin};
use libcommon::{
  user_fields::{Email, Field, TryNewField, Uid},
  AdminEntry, ProviderError, UserRecord, CODE_INVALID_EMAIL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOutcome {
  Granted(Uid),
  /// The user already held `admin: true`; nothing was written
  AlreadyAdmin(Uid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevokeOutcome {
  Revoked(Uid),
  /// The user did not hold `admin: true`; nothing was written
  NotAdmin(Uid),
}

pub async fn grant<T>(store: &T, email: &str) -> ToolResult<GrantOutcome>
where
  T: IdentityAdmin + ?Sized,
{
  let user = lookup(store, email).await?;
  if user.is_admin() {
    info!("{} already holds the admin claim", user.email);
    return Ok(GrantOutcome::AlreadyAdmin(user.uid));
  }
  let granted_claims = user.custom_claims.with_admin();
  store.set_claims(&user.uid, &granted_claims).await?;
  info!("Admin claim granted to {} ({})", user.email, user.uid);
  Ok(GrantOutcome::Granted(user.uid))
}

pub async fn revoke<T>(store: &T, email: &str) -> ToolResult<RevokeOutcome>
where
  T: IdentityAdmin + ?Sized,
{
  let user = lookup(store, email).await?;
  if !user.is_admin() {
    info!("{} does not hold the admin claim", user.email);
    return Ok(RevokeOutcome::NotAdmin(user.uid));
  }
  let remaining_claims = user.custom_claims.without_admin();
  store.set_claims(&user.uid, &remaining_claims).await?;
  info!("Admin claim revoked from {} ({})", user.email, user.uid);
  Ok(RevokeOutcome::Revoked(user.uid))
}

/// Scan every page of the user directory and collect the admins.
/// An empty vector means no admin exists; failures are errors.
pub async fn list_admins<T>(store: &T) -> ToolResult<Vec<AdminEntry>>
where
  T: IdentityAdmin + ?Sized,
{
  let mut admins = Vec::new();
  let mut page_token: Option<String> = None;
  let mut scanned = 0usize;
  loop {
    let page = store.list_users(LIST_USERS_PAGE_SIZE, page_token.as_deref()).await?;
    scanned += page.users.len();
    admins.extend(page.users.iter().filter(|u| u.is_admin()).map(UserRecord::to_admin_entry));
    match page.next_page_token {
      // a provider handing back the same token again would never finish
      Some(next) if page_token.as_deref() == Some(next.as_str()) => {
        return Err(ProviderError::internal(format!("User listing did not advance past page token {next}")).into());
      }
      Some(next) => page_token = Some(next),
      None => break,
    }
  }
  debug!("Scanned {scanned} users, {} admins", admins.len());
  Ok(admins)
}

async fn lookup<T>(store: &T, email: &str) -> ToolResult<UserRecord>
where
  T: IdentityAdmin + ?Sized,
{
  let email = Email::new(email).map_err(|_| {
    ProviderError::new(
      CODE_INVALID_EMAIL,
      format!("The email address is improperly formatted: {email}"),
    )
  })?;
  debug!("Looking up user {email}");
  match store.find_user_by_email(&email).await? {
    Some(user) => Ok(user),
    None => Err(ToolError::UserNotFound {
      email: email.into_string(),
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    secret::Password,
    table::{setup_sqlite, UserPage},
  };
  use async_trait::async_trait;
  use libcommon::CustomClaims;
  use serde_json::json;
  use std::{
    collections::BTreeMap,
    sync::{
      atomic::{AtomicUsize, Ordering},
      Mutex,
    },
  };

  /// Directory kept in uid order, paginated like the SQLite table
  #[derive(Default)]
  struct MemoryStore {
    users: Mutex<BTreeMap<String, UserRecord>>,
    writes: AtomicUsize,
    pages_served: AtomicUsize,
  }

  impl MemoryStore {
    fn insert(&self, uid: &str, email: &str, claims: serde_json::Value) {
      let record = UserRecord {
        uid: Uid::new(uid).unwrap(),
        email: Email::new(email).unwrap(),
        display_name: None,
        custom_claims: serde_json::from_value(claims).unwrap(),
      };
      self.users.lock().unwrap().insert(uid.to_string(), record);
    }
    fn claims_of(&self, uid: &str) -> CustomClaims {
      self.users.lock().unwrap()[uid].custom_claims.clone()
    }
  }

  #[async_trait]
  impl IdentityAdmin for MemoryStore {
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<UserRecord>, ProviderError> {
      Ok(self.users.lock().unwrap().values().find(|u| &u.email == email).cloned())
    }
    async fn set_claims(&self, uid: &Uid, claims: &CustomClaims) -> Result<(), ProviderError> {
      self.writes.fetch_add(1, Ordering::SeqCst);
      let mut users = self.users.lock().unwrap();
      let user = users
        .get_mut(uid.as_str())
        .ok_or_else(|| ProviderError::user_not_found(uid.as_str()))?;
      user.custom_claims = claims.clone();
      Ok(())
    }
    async fn list_users(&self, page_size: u32, page_token: Option<&str>) -> Result<UserPage, ProviderError> {
      self.pages_served.fetch_add(1, Ordering::SeqCst);
      let users = self.users.lock().unwrap();
      let after = page_token.unwrap_or("");
      let mut rest = users.range::<str, _>((std::ops::Bound::Excluded(after), std::ops::Bound::Unbounded));
      let page: Vec<UserRecord> = rest.by_ref().take(page_size as usize).map(|(_, u)| u.clone()).collect();
      let next_page_token = match rest.next() {
        Some(_) => page.last().map(|u| u.uid.as_str().to_string()),
        None => None,
      };
      Ok(UserPage {
        users: page,
        next_page_token,
      })
    }
  }

  struct FailingStore;
  #[async_trait]
  impl IdentityAdmin for FailingStore {
    async fn find_user_by_email(&self, _email: &Email) -> Result<Option<UserRecord>, ProviderError> {
      Err(ProviderError::new("auth/insufficient-permission", "Credential lacks permission"))
    }
    async fn set_claims(&self, _uid: &Uid, _claims: &CustomClaims) -> Result<(), ProviderError> {
      unreachable!()
    }
    async fn list_users(&self, _page_size: u32, _page_token: Option<&str>) -> Result<UserPage, ProviderError> {
      Err(ProviderError::new("auth/insufficient-permission", "Credential lacks permission"))
    }
  }

  /// Directory whose every page points back at the same token
  #[derive(Default)]
  struct StuckStore {
    calls: AtomicUsize,
  }
  #[async_trait]
  impl IdentityAdmin for StuckStore {
    async fn find_user_by_email(&self, _email: &Email) -> Result<Option<UserRecord>, ProviderError> {
      Ok(None)
    }
    async fn set_claims(&self, _uid: &Uid, _claims: &CustomClaims) -> Result<(), ProviderError> {
      unreachable!()
    }
    async fn list_users(&self, _page_size: u32, _page_token: Option<&str>) -> Result<UserPage, ProviderError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(UserPage {
        users: Vec::new(),
        next_page_token: Some("page-2".to_string()),
      })
    }
  }

  #[tokio::test]
  async fn grant_twice_writes_once() {
    let store = MemoryStore::default();
    store.insert("u1", "erin@example.com", json!({}));

    let first = grant(&store, "erin@example.com").await.unwrap();
    assert_eq!(first, GrantOutcome::Granted(Uid::new("u1").unwrap()));
    let after_first = store.claims_of("u1");

    let second = grant(&store, "erin@example.com").await.unwrap();
    assert_eq!(second, GrantOutcome::AlreadyAdmin(Uid::new("u1").unwrap()));
    assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    assert_eq!(store.claims_of("u1"), after_first);
  }

  #[tokio::test]
  async fn revoke_without_admin_is_noop() {
    let store = MemoryStore::default();
    store.insert("u1", "frank@example.com", json!({"admin": false, "tier": "gold"}));
    let outcome = revoke(&store, "frank@example.com").await.unwrap();
    assert_eq!(outcome, RevokeOutcome::NotAdmin(Uid::new("u1").unwrap()));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    assert_eq!(store.claims_of("u1").get("admin"), Some(&json!(false)));
  }

  #[tokio::test]
  async fn grant_preserves_other_claims() {
    let store = MemoryStore::default();
    store.insert("u1", "gina@example.com", json!({"editor": true, "org": {"id": 7}}));
    grant(&store, "gina@example.com").await.unwrap();
    let expected: CustomClaims = serde_json::from_value(json!({"editor": true, "org": {"id": 7}, "admin": true})).unwrap();
    assert_eq!(store.claims_of("u1"), expected);
  }

  #[tokio::test]
  async fn revoke_removes_only_admin_key() {
    let store = MemoryStore::default();
    store.insert("u1", "hank@example.com", json!({"admin": true, "editor": true, "org": "acme"}));
    revoke(&store, "hank@example.com").await.unwrap();
    let claims = store.claims_of("u1");
    let expected: CustomClaims = serde_json::from_value(json!({"editor": true, "org": "acme"})).unwrap();
    assert_eq!(claims, expected);
    // removed, not set to false
    assert!(claims.get("admin").is_none());
  }

  #[tokio::test]
  async fn unknown_email_is_user_not_found() {
    let store = MemoryStore::default();
    let Err(ToolError::UserNotFound { email }) = grant(&store, "Nobody@Example.com").await else {
      panic!("expected UserNotFound");
    };
    assert_eq!(email, "nobody@example.com");
    assert!(matches!(
      revoke(&store, "nobody@example.com").await,
      Err(ToolError::UserNotFound { .. })
    ));
  }

  #[tokio::test]
  async fn malformed_email_is_provider_error() {
    let store = MemoryStore::default();
    let Err(ToolError::Provider(e)) = grant(&store, "not-an-email").await else {
      panic!("expected provider error");
    };
    assert_eq!(e.code, CODE_INVALID_EMAIL);
  }

  #[tokio::test]
  async fn provider_errors_are_surfaced_with_code() {
    let Err(ToolError::Provider(e)) = grant(&FailingStore, "ivy@example.com").await else {
      panic!("expected provider error");
    };
    assert_eq!(e.code, "auth/insufficient-permission");
    assert!(matches!(list_admins(&FailingStore).await, Err(ToolError::Provider(_))));
  }

  #[tokio::test]
  async fn repeated_page_token_stops_listing() {
    let store = StuckStore::default();
    let Err(ToolError::Provider(e)) = list_admins(&store).await else {
      panic!("expected provider error");
    };
    assert!(e.message.contains("page-2"));
    assert_eq!(store.calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn list_scans_every_page() {
    let store = MemoryStore::default();
    let mut expected = Vec::new();
    for i in 0..2500 {
      let uid = format!("uid-{i:05}");
      let email = format!("user{i}@example.com");
      let claims = match i % 7 {
        0 => json!({"admin": true}),
        1 => json!({"admin": false}),
        2 => json!({"admin": "true"}),
        _ => json!({}),
      };
      if i % 7 == 0 {
        expected.push(email.clone());
      }
      store.insert(&uid, &email, claims);
    }

    let admins = list_admins(&store).await.unwrap();
    assert_eq!(store.pages_served.load(Ordering::SeqCst), 3);
    let mut emails: Vec<String> = admins.iter().map(|a| a.email.clone()).collect();
    emails.sort();
    let before_dedup = emails.len();
    emails.dedup();
    assert_eq!(before_dedup, emails.len());
    expected.sort();
    assert_eq!(emails, expected);
    assert!(admins.iter().all(|a| a.display_name == "N/A"));
  }

  #[tokio::test]
  async fn list_of_empty_directory_is_ok() {
    let store = MemoryStore::default();
    store.insert("u1", "jo@example.com", json!({}));
    assert!(list_admins(&store).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn alice_grant_list_revoke_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("identity.db").display());
    let table = setup_sqlite(&url).await.unwrap();
    let alice = UserRecord {
      uid: Uid::new("alice-uid").unwrap(),
      email: Email::new("alice@example.com").unwrap(),
      display_name: None,
      custom_claims: CustomClaims::new(),
    };
    let hash = Password::new("pw").unwrap().hash().unwrap();
    table.add(&alice, &hash).await.unwrap();

    grant(&table, "alice@example.com").await.unwrap();
    let stored = table.find_user_by_uid(&alice.uid).await.unwrap().unwrap();
    assert_eq!(stored.custom_claims, CustomClaims::new().with_admin());
    let listed = list_admins(&table).await.unwrap();
    assert!(listed.iter().any(|a| a.email == "alice@example.com" && a.uid == "alice-uid"));

    revoke(&table, "alice@example.com").await.unwrap();
    let stored = table.find_user_by_uid(&alice.uid).await.unwrap().unwrap();
    assert!(stored.custom_claims.is_empty());
    assert!(list_admins(&table).await.unwrap().is_empty());
  }
}
