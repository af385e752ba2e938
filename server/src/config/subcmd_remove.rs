use super::{email_arg, ClapSubCommand};
use crate::{
  admin::{revoke, RevokeOutcome},
  error::*,
  state::AppState,
};
use async_trait::async_trait;
use clap::{ArgMatches, Command};

pub(super) struct Remove {}

#[async_trait]
impl ClapSubCommand for Remove {
  fn subcmd() -> Command {
    Command::new("remove")
      .about("Revoke the admin claim from a user")
      .arg(email_arg("Email of the user to revoke admin rights from"))
  }

  async fn exec_matches(sub_m: &ArgMatches, state: &AppState) -> ToolResult<()> {
    let Some(email) = sub_m.get_one::<String>("email") else {
      return Err(anyhow!("Email must be specified").into());
    };
    println!("Looking up user: {email}...");
    match revoke(&state.table, email).await? {
      RevokeOutcome::Revoked(uid) => {
        println!("Success! Admin rights revoked from {email} (UID: {uid})");
      }
      RevokeOutcome::NotAdmin(uid) => {
        println!("{email} has no admin rights (UID: {uid}). Nothing to do.");
      }
    }
    Ok(())
  }
}
