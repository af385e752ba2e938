use super::{email_arg, ClapSubCommand};
use crate::{
  admin::{grant, GrantOutcome},
  error::*,
  state::AppState,
};
use async_trait::async_trait;
use clap::{ArgMatches, Command};

pub(super) struct Add {}

#[async_trait]
impl ClapSubCommand for Add {
  fn subcmd() -> Command {
    Command::new("add")
      .about("Grant the admin claim to a user")
      .arg(email_arg("Email of the user to grant admin rights"))
  }

  async fn exec_matches(sub_m: &ArgMatches, state: &AppState) -> ToolResult<()> {
    let Some(email) = sub_m.get_one::<String>("email") else {
      return Err(anyhow!("Email must be specified").into());
    };
    println!("Looking up user: {email}...");
    match grant(&state.table, email).await? {
      GrantOutcome::Granted(uid) => {
        println!("Success! Admin rights granted to {email}");
        println!("   UID: {uid}");
        println!();
        println!("Note: the user must sign out and sign back in (or force a token refresh)");
        println!("      before the change takes effect.");
      }
      GrantOutcome::AlreadyAdmin(uid) => {
        println!("{email} already has admin rights (UID: {uid}). Nothing to do.");
      }
    }
    Ok(())
  }
}
