//! Password material of local users. Plain passwords never leave this module except to be hashed.

use crate::{argon2::*, error::*};
use std::fmt;
use validator::Validate;

#[derive(Clone, Validate)]
pub struct Password {
  #[validate(length(min = 1))]
  value: String,
}

impl Password {
  pub fn new(value: impl Into<String>) -> Result<Self> {
    let password = Self { value: value.into() };
    password.validate()?;
    Ok(password)
  }

  pub fn hash(&self) -> Result<EncodedHash> {
    Ok(EncodedHash {
      value: generate_argon2(&self.value)?,
    })
  }

  pub fn matches(&self, encoded_hash: &EncodedHash) -> Result<bool> {
    verify_argon2(&self.value, &encoded_hash.value)
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(****)")
  }
}

/// Argon2 PHC string including salt and parameters, as stored in the user table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedHash {
  value: String,
}

impl EncodedHash {
  pub fn from_stored(value: impl Into<String>) -> Result<Self> {
    let value = value.into();
    ensure!(value.starts_with("$argon2"), "Stored password hash is not an argon2 hash");
    Ok(Self { value })
  }

  pub fn as_str(&self) -> &str {
    &self.value
  }
}
