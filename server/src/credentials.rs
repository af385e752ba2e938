use crate::{constants::BIN_NAME, error::*};
use serde::Deserialize;
use std::{fs, path::Path};
use validator::Validate;

#[derive(Deserialize, Validate, Debug, Clone)]
/// Service credentials granting elevated access to the identity provider
pub struct ServiceCredentials {
  #[validate(length(min = 1))]
  pub project_id: String,
  #[validate(email)]
  pub client_email: String,
  /// SQLite url of the identity store, like "sqlite:./identity.db"
  #[validate(length(min = 1))]
  pub database_url: String,
}

impl ServiceCredentials {
  /// Read and validate the credential file. Never touches the provider.
  pub fn load(path: &Path) -> ToolResult<Self> {
    let path_str = path.display().to_string();
    if !path.is_file() {
      return Err(ToolError::ConfigurationMissing { path: path_str });
    }
    let invalid = |reason: String| ToolError::InvalidCredentials {
      path: path_str.clone(),
      reason,
    };
    let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let credentials: ServiceCredentials = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
    credentials.validate().map_err(|e| invalid(e.to_string()))?;
    Ok(credentials)
  }
}

pub(crate) fn setup_instructions(path: &str) -> String {
  format!(
    r#"
Setup:
  1. Obtain the service credential file for your project from the identity provider console.
  2. Save it as {path} (or pass another location with --credentials <PATH>).
     It is a JSON document like:
       {{ "project_id": "my-project", "client_email": "admin-tool@my-project.example", "database_url": "sqlite:./identity.db" }}
  3. Never commit this file to version control.
  4. Run `{BIN_NAME} --help` to see available commands."#
  )
}
