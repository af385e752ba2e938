use crate::{auth_state::AuthSnapshot, constants::LOGIN_PATH};
use libcommon::AuthUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of the access guard
pub enum GuardDecision {
  /// Admin status is not known yet. Neither grant nor deny.
  Wait,
  /// Deny and send the user to the given entry point
  Redirect(&'static str),
  Admit,
}

/// Decide access to protected functionality.
/// Must be re-evaluated on every auth-state transition, not only at startup.
pub fn decide(loading: bool, identity: Option<&AuthUser>, is_admin: bool) -> GuardDecision {
  if loading {
    return GuardDecision::Wait;
  }
  match identity {
    Some(_) if is_admin => GuardDecision::Admit,
    _ => GuardDecision::Redirect(LOGIN_PATH),
  }
}

pub fn decide_snapshot(snapshot: &AuthSnapshot) -> GuardDecision {
  decide(snapshot.loading, snapshot.user.as_ref(), snapshot.is_admin)
}

#[cfg(test)]
mod tests {
  use super::*;
  use libcommon::user_fields::{Email, TryNewField, Uid};

  fn user() -> AuthUser {
    AuthUser {
      uid: Uid::new("uid-1").unwrap(),
      email: Email::new("alice@example.com").unwrap(),
      display_name: None,
    }
  }

  #[test]
  fn waits_while_loading_whatever_the_rest() {
    let u = user();
    assert_eq!(decide(true, None, false), GuardDecision::Wait);
    assert_eq!(decide(true, Some(&u), true), GuardDecision::Wait);
    assert_eq!(decide(true, Some(&u), false), GuardDecision::Wait);
  }

  #[test]
  fn redirects_without_identity_or_admin() {
    let u = user();
    assert_eq!(decide(false, None, false), GuardDecision::Redirect("/login"));
    // stale admin flag without identity still denies
    assert_eq!(decide(false, None, true), GuardDecision::Redirect("/login"));
    assert_eq!(decide(false, Some(&u), false), GuardDecision::Redirect("/login"));
  }

  #[test]
  fn admits_signed_in_admin() {
    let u = user();
    assert_eq!(decide(false, Some(&u), true), GuardDecision::Admit);
  }

  #[test]
  fn initial_snapshot_waits() {
    assert_eq!(decide_snapshot(&AuthSnapshot::default()), GuardDecision::Wait);
  }
}
