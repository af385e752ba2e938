use super::{Field, TryNewField};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};
use validator::Validate;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Validate)]
/// Email address of a user record.
/// Stored lower-cased so that lookups are case-insensitive.
pub struct Email {
  #[validate(email)]
  value: String,
}
impl<'a, T> TryNewField<T> for Email
where
  T: Into<Cow<'a, str>>,
{
  fn new(email: T) -> Result<Self> {
    let value = email.into().trim().to_lowercase();
    let object = Self { value };
    object.validate()?;
    Ok(object)
  }
}
impl Field for Email {
  fn as_str(&self) -> &str {
    &self.value
  }
  fn into_string(self) -> String {
    self.value
  }
}
impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.value)
  }
}
impl Serialize for Email {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(self.as_str())
  }
}
impl<'de> Deserialize<'de> for Email {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Email::new(s).map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalizes_case_and_whitespace() {
    let email = Email::new("  Alice@Example.COM ").unwrap();
    assert_eq!(email.as_str(), "alice@example.com");
    assert_eq!(email, Email::new("alice@example.com").unwrap());
  }

  #[test]
  fn rejects_malformed_address() {
    assert!(Email::new("not-an-email").is_err());
    assert!(Email::new("").is_err());
  }
}
