use super::{Field, TryNewField};
use anyhow::Result;
use std::{borrow::Cow, fmt};
use validator::Validate;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Validate)]
/// Opaque identifier of a user record assigned by the identity provider
pub struct Uid {
  #[validate(length(min = 1))]
  value: String,
}
impl<'a, T: Into<Cow<'a, str>>> TryNewField<T> for Uid {
  fn new(uid: T) -> Result<Self> {
    let value = uid.into().to_string();
    let object = Self { value };
    object.validate()?;
    Ok(object)
  }
}
impl Field for Uid {
  fn as_str(&self) -> &str {
    &self.value
  }
  fn into_string(self) -> String {
    self.value
  }
}
impl fmt::Display for Uid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.value)
  }
}
