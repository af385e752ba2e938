use crate::{
  credentials::ServiceCredentials,
  error::*,
  log::*,
  table::{setup_sqlite, SqliteUserTable},
};
use std::path::Path;

/// Provider handle shared by every command of one invocation. Built once, after the
/// credential file has been checked; the credentials themselves are not kept.
pub struct AppState {
  pub table: SqliteUserTable,
}

impl AppState {
  pub async fn init(credentials_path: &Path) -> ToolResult<Self> {
    let credentials = ServiceCredentials::load(credentials_path)?;
    let table = setup_sqlite(&credentials.database_url).await?;
    info!(
      "Identity store initialized for project {} as {}",
      credentials.project_id, credentials.client_email
    );
    Ok(Self { table })
  }

  pub async fn shutdown(&self) {
    self.table.close().await;
  }
}
