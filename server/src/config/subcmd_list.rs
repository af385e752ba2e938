use super::ClapSubCommand;
use crate::{admin::list_admins, error::*, state::AppState};
use async_trait::async_trait;
use clap::{ArgMatches, Command};

pub(super) struct List {}

#[async_trait]
impl ClapSubCommand for List {
  fn subcmd() -> Command {
    Command::new("list").about("List all users holding the admin claim")
  }

  async fn exec_matches(_sub_m: &ArgMatches, state: &AppState) -> ToolResult<()> {
    println!("Searching for admins...");
    let admins = list_admins(&state.table).await?;
    if admins.is_empty() {
      println!("No admins found.");
      return Ok(());
    }
    println!("Found {} admin(s):", admins.len());
    println!();
    for (index, admin) in admins.iter().enumerate() {
      println!("{}. {}", index + 1, admin.email);
      println!("   UID: {}", admin.uid);
      println!("   Name: {}", admin.display_name);
      println!();
    }
    Ok(())
  }
}
