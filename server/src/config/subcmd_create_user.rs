use super::{email_arg, ClapSubCommand};
use crate::{
  argon2::generate_random_string,
  constants::PASSWORD_LEN,
  error::*,
  log::*,
  secret::Password,
  state::AppState,
};
use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command};
use libcommon::{
  user_fields::{DisplayName, Email, Field, TryNewField, Uid},
  CustomClaims, ProviderError, UserRecord, CODE_INVALID_EMAIL,
};
use uuid::Uuid;

pub(super) struct CreateUser {}

#[async_trait]
impl ClapSubCommand for CreateUser {
  fn subcmd() -> Command {
    Command::new("create-user")
      .about("Provision a user record without any custom claims")
      .arg(email_arg("Email of the new user"))
      .arg(
        Arg::new("display_name")
          .short('n')
          .long("display-name")
          .value_name("NAME")
          .help("Display name of the new user"),
      )
      .arg(
        Arg::new("password")
          .short('p')
          .long("password")
          .value_name("PASSWORD")
          .help("Password of the new user. Randomly generated if omitted."),
      )
  }

  async fn exec_matches(sub_m: &ArgMatches, state: &AppState) -> ToolResult<()> {
    let Some(email) = sub_m.get_one::<String>("email") else {
      return Err(anyhow!("Email must be specified").into());
    };
    let email = Email::new(email.as_str()).map_err(|_| {
      ProviderError::new(
        CODE_INVALID_EMAIL,
        format!("The email address is improperly formatted: {email}"),
      )
    })?;
    let display_name = sub_m
      .get_one::<String>("display_name")
      .map(|d| DisplayName::new(d.as_str()))
      .transpose()?;

    let (password, generated) = password_for(sub_m.get_one::<String>("password").map(String::as_str))?;
    let record = UserRecord {
      uid: Uid::new(Uuid::new_v4().to_string())?,
      email,
      display_name,
      custom_claims: CustomClaims::new(),
    };
    let encoded_hash = password.hash()?;
    state.table.add(&record, &encoded_hash).await?;

    println!("Created user {} (UID: {})", record.email, record.uid.as_str());
    if let Some(generated) = generated.as_deref() {
      warn!("No password given for {}, a random one was generated", record.email);
      println!("Generated password (shown only once, store it safely):");
      println!("  {generated}");
    }
    Ok(())
  }
}

/// Password given on the command line, or a random one returned alongside for display
fn password_for(given: Option<&str>) -> ToolResult<(Password, Option<String>)> {
  match given {
    Some(p) => Ok((Password::new(p)?, None)),
    None => {
      let generated = generate_random_string(PASSWORD_LEN)?;
      Ok((Password::new(generated.as_str())?, Some(generated)))
    }
  }
}
