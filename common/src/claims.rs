use crate::constants::ADMIN_CLAIM_KEY;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Custom claims attached to a user record and snapshotted into session tokens.
pub struct CustomClaims(Map<String, Value>);

impl CustomClaims {
  pub fn new() -> Self {
    Self::default()
  }

  /// Admin status. Only a present key holding JSON `true` counts, so `"true"`, `1` or `null` do not.
  pub fn is_admin(&self) -> bool {
    matches!(self.0.get(ADMIN_CLAIM_KEY), Some(Value::Bool(true)))
  }

  /// Copy of these claims with `admin` set to `true`. Other keys are left untouched.
  pub fn with_admin(&self) -> Self {
    let mut granted = self.0.clone();
    granted.insert(ADMIN_CLAIM_KEY.to_string(), Value::Bool(true));
    Self(granted)
  }

  /// Copy of these claims with the `admin` key removed entirely. Other keys are left untouched.
  pub fn without_admin(&self) -> Self {
    let mut remaining = self.0.clone();
    remaining.remove(ADMIN_CLAIM_KEY);
    Self(remaining)
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }
  pub fn len(&self) -> usize {
    self.0.len()
  }
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}
