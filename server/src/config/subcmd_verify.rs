use super::{email_arg, ClapSubCommand};
use crate::{error::*, provider::LocalAuthProvider, state::AppState};
use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command};
use libclient::SessionResolver;
use std::sync::Arc;

pub(super) struct Verify {}

#[async_trait]
impl ClapSubCommand for Verify {
  fn subcmd() -> Command {
    Command::new("verify")
      .about("Sign in as a user and check that an admin session can be established")
      .arg(email_arg("Email of the user to sign in as"))
      .arg(
        Arg::new("password")
          .short('p')
          .long("password")
          .value_name("PASSWORD")
          .required(true)
          .help("Password of the user"),
      )
  }

  async fn exec_matches(sub_m: &ArgMatches, state: &AppState) -> ToolResult<()> {
    let (Some(email), Some(password)) = (
      sub_m.get_one::<String>("email"),
      sub_m.get_one::<String>("password"),
    ) else {
      return Err(anyhow!("Email and password must be specified").into());
    };

    let provider = Arc::new(LocalAuthProvider::new(state.table.clone()));
    let resolver = SessionResolver::new(provider).await;
    let user = resolver.login(email, password).await?;
    println!("Admin session established for {} (UID: {})", user.email, user.uid);
    resolver.logout().await?;
    Ok(())
  }
}
