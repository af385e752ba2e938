mod parse_opts;
mod subcmd_add;
mod subcmd_create_user;
mod subcmd_list;
mod subcmd_remove;
mod subcmd_verify;

use crate::{error::ToolResult, state::AppState};
use async_trait::async_trait;
pub use parse_opts::parse_opts;

#[async_trait]
trait ClapSubCommand {
  fn subcmd() -> clap::Command;

  async fn exec_matches(sub_m: &clap::ArgMatches, state: &AppState) -> ToolResult<()>;
}

fn email_arg(help: &'static str) -> clap::Arg {
  clap::Arg::new("email")
    .value_name("EMAIL")
    .required(true)
    .help(help)
}
