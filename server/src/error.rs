pub use anyhow::{anyhow, bail, ensure, Error, Result};
use libclient::AuthError;
use libcommon::ProviderError;

pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Unrecoverable outcomes of an operator command. All of them terminate the process with exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
  #[error("User with email \"{email}\" does not exist")]
  UserNotFound { email: String },

  #[error("Service credential file not found: {path}")]
  ConfigurationMissing { path: String },

  #[error("Invalid service credential file {path}: {reason}")]
  InvalidCredentials { path: String, reason: String },

  #[error("Unknown command: {0}")]
  UnknownCommand(String),

  /// Command line rejected by the parser, already rendered with usage
  #[error("{0}")]
  Usage(String),

  #[error("Not authorized: {message}")]
  NotAuthorized { message: String },

  #[error("{}\n   Code: {}", .0.message, .0.code)]
  Provider(#[from] ProviderError),

  // black hole
  #[error(transparent)]
  Other(#[from] anyhow::Error),
}

impl ToolError {
  pub fn exit_code(&self) -> i32 {
    1
  }

  /// Operator-actionable hint printed after the error
  pub fn guidance(&self) -> Option<String> {
    match self {
      ToolError::UserNotFound { email } => Some(format!(
        "Create the user first, e.g. with: claim-admin create-user {email}"
      )),
      ToolError::ConfigurationMissing { path } => Some(crate::credentials::setup_instructions(path)),
      ToolError::UnknownCommand(_) => Some("Use one of: add, remove, list, create-user, verify (see --help)".to_string()),
      _ => None,
    }
  }
}

impl From<AuthError> for ToolError {
  fn from(value: AuthError) -> Self {
    match value {
      AuthError::NotAuthorized { message } => ToolError::NotAuthorized { message },
      AuthError::SignInFailed { code, message } => ToolError::Provider(ProviderError::new(code, message)),
      AuthError::Provider(e) => ToolError::Provider(e),
      AuthError::Other(e) => ToolError::Other(e),
    }
  }
}
