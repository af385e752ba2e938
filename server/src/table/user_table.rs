use super::{IdentityAdmin, UserPage};
use crate::{
  constants::USER_TABLE_NAME,
  error::*,
  secret::EncodedHash,
};
use async_trait::async_trait;
use chrono::Utc;
use libcommon::{
  user_fields::{DisplayName, Email, Field, TryNewField, Uid},
  CustomClaims, ProviderError, UserRecord, CODE_EMAIL_ALREADY_EXISTS,
};
use sqlx::sqlite::SqlitePool;

#[derive(Debug, Clone)]
pub struct SqliteUserTable {
  pool: SqlitePool,
}

impl SqliteUserTable {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  pub async fn close(&self) {
    self.pool.close().await;
  }

  /// Insert a new user record together with its password hash
  pub async fn add(&self, record: &UserRecord, encoded_hash: &EncodedHash) -> Result<(), ProviderError> {
    let sql = format!(
      "insert into {} (uid, email, display_name, encoded_hash, custom_claims, created_at) VALUES (?, ?, ?, ?, ?, ?)",
      USER_TABLE_NAME
    );
    let claims = serde_json::to_string(&record.custom_claims).map_err(store_error)?;
    let res = sqlx::query(&sql)
      .bind(record.uid.as_str())
      .bind(record.email.as_str())
      .bind(record.display_name.as_ref().map(|d| d.as_str()))
      .bind(encoded_hash.as_str())
      .bind(claims)
      .bind(Utc::now().to_rfc3339())
      .execute(&self.pool)
      .await;
    match res {
      Ok(_) => Ok(()),
      Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(ProviderError::new(
        CODE_EMAIL_ALREADY_EXISTS,
        format!("The email address is already in use by another account: {}", record.email),
      )),
      Err(e) => Err(store_error(e)),
    }
  }

  /// User record and password hash for the given email
  pub async fn find_credential(&self, email: &Email) -> Result<Option<(UserRecord, EncodedHash)>, ProviderError> {
    let sql = format!("select * from {} where email = ?", USER_TABLE_NAME);
    let row: Option<UserRow> = sqlx::query_as(&sql)
      .bind(email.as_str())
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error)?;
    row.map(|r| r.try_into_parts().map_err(store_error)).transpose()
  }

  pub async fn find_user_by_uid(&self, uid: &Uid) -> Result<Option<UserRecord>, ProviderError> {
    let sql = format!("select * from {} where uid = ?", USER_TABLE_NAME);
    let row: Option<UserRow> = sqlx::query_as(&sql)
      .bind(uid.as_str())
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error)?;
    row
      .map(|r| r.try_into_parts().map(|(record, _)| record).map_err(store_error))
      .transpose()
  }
}

#[async_trait]
impl IdentityAdmin for SqliteUserTable {
  async fn find_user_by_email(&self, email: &Email) -> Result<Option<UserRecord>, ProviderError> {
    Ok(self.find_credential(email).await?.map(|(record, _)| record))
  }

  async fn set_claims(&self, uid: &Uid, claims: &CustomClaims) -> Result<(), ProviderError> {
    let sql = format!("update {} set custom_claims = ? where uid = ?", USER_TABLE_NAME);
    let claims = serde_json::to_string(claims).map_err(store_error)?;
    let res = sqlx::query(&sql)
      .bind(claims)
      .bind(uid.as_str())
      .execute(&self.pool)
      .await
      .map_err(store_error)?;
    if res.rows_affected() == 0 {
      return Err(ProviderError::user_not_found(uid.as_str()));
    }
    Ok(())
  }

  /// Pages are ordered by uid; the page token is the last uid of the previous page.
  async fn list_users(&self, page_size: u32, page_token: Option<&str>) -> Result<UserPage, ProviderError> {
    let sql = format!(
      "select * from {} where uid > ? order by uid limit ?",
      USER_TABLE_NAME
    );
    // one extra row tells whether another page follows
    let rows: Vec<UserRow> = sqlx::query_as(&sql)
      .bind(page_token.unwrap_or(""))
      .bind(page_size as i64 + 1)
      .fetch_all(&self.pool)
      .await
      .map_err(store_error)?;
    let has_more = rows.len() > page_size as usize;

    let users = rows
      .into_iter()
      .take(page_size as usize)
      .map(|r| r.try_into_parts().map(|(record, _)| record))
      .collect::<Result<Vec<_>>>()
      .map_err(store_error)?;
    let next_page_token = match (has_more, users.last()) {
      (true, Some(last)) => Some(last.uid.as_str().to_string()),
      _ => None,
    };
    Ok(UserPage { users, next_page_token })
  }
}

fn store_error(e: impl std::fmt::Display) -> ProviderError {
  ProviderError::internal(format!("Identity store error: {e}"))
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  uid: String,
  email: String,
  display_name: Option<String>,
  encoded_hash: String,
  custom_claims: String,
}

impl UserRow {
  fn try_into_parts(self) -> Result<(UserRecord, EncodedHash)> {
    let custom_claims: CustomClaims = serde_json::from_str(&self.custom_claims)?;
    let record = UserRecord {
      uid: Uid::new(self.uid)?,
      email: Email::new(self.email)?,
      display_name: self.display_name.map(DisplayName::new).transpose()?,
      custom_claims,
    };
    Ok((record, EncodedHash::from_stored(self.encoded_hash)?))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{secret::Password, table::setup_sqlite};
  use serde_json::json;

  async fn table() -> (tempfile::TempDir, SqliteUserTable) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("identity.db").display());
    let table = setup_sqlite(&url).await.unwrap();
    (dir, table)
  }

  fn record(uid: &str, email: &str, claims: serde_json::Value) -> UserRecord {
    UserRecord {
      uid: Uid::new(uid).unwrap(),
      email: Email::new(email).unwrap(),
      display_name: None,
      custom_claims: serde_json::from_value(claims).unwrap(),
    }
  }

  fn hash() -> EncodedHash {
    Password::new("pw").unwrap().hash().unwrap()
  }

  #[tokio::test]
  async fn add_find_and_set_claims() {
    let (_dir, table) = table().await;
    table
      .add(&record("u1", "Carol@Example.com", json!({"tier": "gold"})), &hash())
      .await
      .unwrap();

    let found = table
      .find_user_by_email(&Email::new("CAROL@example.com").unwrap())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(found.uid.as_str(), "u1");
    assert_eq!(found.custom_claims.get("tier"), Some(&json!("gold")));

    let claims = found.custom_claims.with_admin();
    table.set_claims(&found.uid, &claims).await.unwrap();
    let reloaded = table.find_user_by_uid(&found.uid).await.unwrap().unwrap();
    assert_eq!(reloaded.custom_claims, claims);
  }

  #[tokio::test]
  async fn duplicate_email_is_rejected() {
    let (_dir, table) = table().await;
    table.add(&record("u1", "dup@example.com", json!({})), &hash()).await.unwrap();
    let err = table
      .add(&record("u2", "DUP@example.com", json!({})), &hash())
      .await
      .unwrap_err();
    assert_eq!(err.code, CODE_EMAIL_ALREADY_EXISTS);
  }

  #[tokio::test]
  async fn missing_user_lookups() {
    let (_dir, table) = table().await;
    let email = Email::new("ghost@example.com").unwrap();
    assert!(table.find_user_by_email(&email).await.unwrap().is_none());
    let err = table
      .set_claims(&Uid::new("ghost").unwrap(), &CustomClaims::new())
      .await
      .unwrap_err();
    assert!(err.is_user_not_found());
  }

  #[tokio::test]
  async fn pages_follow_tokens_until_exhausted() {
    let (_dir, table) = table().await;
    for i in 0..5 {
      table
        .add(&record(&format!("u{i}"), &format!("user{i}@example.com"), json!({})), &hash())
        .await
        .unwrap();
    }
    let first = table.list_users(2, None).await.unwrap();
    assert_eq!(first.users.len(), 2);
    let second = table.list_users(2, first.next_page_token.as_deref()).await.unwrap();
    assert_eq!(second.users.len(), 2);
    let third = table.list_users(2, second.next_page_token.as_deref()).await.unwrap();
    assert_eq!(third.users.len(), 1);
    assert!(third.next_page_token.is_none());
  }
}
