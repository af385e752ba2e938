use crate::constants::*;
use libcommon::{ProviderError, CODE_INVALID_CREDENTIAL, CODE_INVALID_EMAIL, CODE_USER_NOT_FOUND, CODE_WRONG_PASSWORD};

/// Map a provider sign-in failure to the message shown on the login form
pub(crate) fn sign_in_failure_message(err: &ProviderError) -> String {
  match err.code.as_str() {
    CODE_USER_NOT_FOUND => MSG_USER_NOT_FOUND.to_string(),
    CODE_WRONG_PASSWORD => MSG_WRONG_PASSWORD.to_string(),
    CODE_INVALID_EMAIL => MSG_INVALID_EMAIL.to_string(),
    CODE_INVALID_CREDENTIAL => MSG_INVALID_CREDENTIAL.to_string(),
    _ if !err.message.is_empty() => err.message.clone(),
    _ => MSG_SIGN_IN_FAILED.to_string(),
  }
}
