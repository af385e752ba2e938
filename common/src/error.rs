use crate::constants::*;
use thiserror::Error;

/// Error reported by an identity provider, carrying the provider's native code and message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code: {code})")]
pub struct ProviderError {
  pub code: String,
  pub message: String,
}

impl ProviderError {
  pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      code: code.into(),
      message: message.into(),
    }
  }
  pub fn user_not_found(email: &str) -> Self {
    Self::new(
      CODE_USER_NOT_FOUND,
      format!("There is no user record corresponding to the provided identifier: {email}"),
    )
  }
  pub fn no_current_user() -> Self {
    Self::new(CODE_NO_CURRENT_USER, "No user is currently signed in")
  }
  pub fn internal(message: impl Into<String>) -> Self {
    Self::new(CODE_INTERNAL_ERROR, message)
  }
  pub fn is_user_not_found(&self) -> bool {
    self.code == CODE_USER_NOT_FOUND
  }
}
