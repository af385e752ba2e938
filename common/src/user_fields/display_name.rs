use super::{Field, TryNewField};
use anyhow::Result;
use std::borrow::Cow;
use validator::Validate;

#[derive(Debug, Clone, Eq, PartialEq, Validate)]
pub struct DisplayName {
  #[validate(length(min = 1))]
  value: String,
}
impl<'a, T: Into<Cow<'a, str>>> TryNewField<T> for DisplayName {
  fn new(display_name: T) -> Result<Self> {
    let value = display_name.into().trim().to_string();
    let object = Self { value };
    object.validate()?;
    Ok(object)
  }
}
impl Field for DisplayName {
  fn as_str(&self) -> &str {
    &self.value
  }
  fn into_string(self) -> String {
    self.value
  }
}
