mod user_table;

use crate::{error::*, log::*};
use async_trait::async_trait;
use libcommon::{
  user_fields::{Email, Uid},
  CustomClaims, ProviderError, UserRecord,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

pub use user_table::SqliteUserTable;

/// One page of the user directory
#[derive(Debug, Clone)]
pub struct UserPage {
  pub users: Vec<UserRecord>,
  /// Token of the next page, `None` when the directory is exhausted
  pub next_page_token: Option<String>,
}

/// Identity provider operations available with service credentials
#[async_trait]
pub trait IdentityAdmin: Send + Sync {
  async fn find_user_by_email(&self, email: &Email) -> Result<Option<UserRecord>, ProviderError>;
  /// Replace the whole claims mapping of a user in one write
  async fn set_claims(&self, uid: &Uid, claims: &CustomClaims) -> Result<(), ProviderError>;
  async fn list_users(&self, page_size: u32, page_token: Option<&str>) -> Result<UserPage, ProviderError>;
}

/// Setup sqlite database with automatic creation of the user table
pub async fn setup_sqlite(sqlite_url: &str) -> Result<SqliteUserTable> {
  let conn_opts = SqliteConnectOptions::from_str(sqlite_url)?.create_if_missing(true);
  let pool = SqlitePoolOptions::default().connect_with(conn_opts).await?;

  // Embed migrations into binary
  sqlx::migrate!("./migrations").run(&pool).await?;
  debug!("Identity store ready at {sqlite_url}");

  Ok(SqliteUserTable::new(pool))
}
