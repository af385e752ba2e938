use crate::{
  claims::CustomClaims,
  constants::DISPLAY_NAME_PLACEHOLDER,
  user_fields::{DisplayName, Email, Field, Uid},
};

#[derive(Debug, Clone, PartialEq)]
/// User record owned by the identity provider
pub struct UserRecord {
  pub uid: Uid,
  pub email: Email,
  pub display_name: Option<DisplayName>,
  pub custom_claims: CustomClaims,
}

impl UserRecord {
  pub fn is_admin(&self) -> bool {
    self.custom_claims.is_admin()
  }
  pub fn to_admin_entry(&self) -> AdminEntry {
    AdminEntry {
      email: self.email.as_str().to_string(),
      uid: self.uid.as_str().to_string(),
      display_name: self
        .display_name
        .as_ref()
        .map(|d| d.as_str().to_string())
        .unwrap_or_else(|| DISPLAY_NAME_PLACEHOLDER.to_string()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Projection of an admin user printed by the directory listing
pub struct AdminEntry {
  pub email: String,
  pub uid: String,
  pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Identity of an authenticated end user as seen by the client
pub struct AuthUser {
  pub uid: Uid,
  pub email: Email,
  pub display_name: Option<DisplayName>,
}

impl From<&UserRecord> for AuthUser {
  fn from(value: &UserRecord) -> Self {
    Self {
      uid: value.uid.clone(),
      email: value.email.clone(),
      display_name: value.display_name.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::user_fields::TryNewField;

  #[test]
  fn admin_entry_uses_placeholder_for_missing_display_name() {
    let record = UserRecord {
      uid: Uid::new("u1").unwrap(),
      email: Email::new("bob@example.com").unwrap(),
      display_name: None,
      custom_claims: CustomClaims::new().with_admin(),
    };
    let entry = record.to_admin_entry();
    assert_eq!(entry.display_name, "N/A");
    assert_eq!(entry.email, "bob@example.com");
    assert_eq!(entry.uid, "u1");
  }
}
