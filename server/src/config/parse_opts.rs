use super::{
  subcmd_add::Add, subcmd_create_user::CreateUser, subcmd_list::List, subcmd_remove::Remove, subcmd_verify::Verify,
  ClapSubCommand,
};
use crate::{
  constants::{BIN_NAME, DEFAULT_CREDENTIALS_PATH},
  error::*,
  log::*,
  state::AppState,
};
use clap::{command, error::ErrorKind, Arg, ArgMatches, Command};
use std::{ffi::OsString, path::PathBuf};

const KNOWN_COMMANDS: [&str; 5] = ["add", "remove", "list", "create-user", "verify"];

pub async fn parse_opts() -> ToolResult<()> {
  run_from(std::env::args_os()).await
}

fn build_command() -> Command {
  let _ = include_str!("../../Cargo.toml");

  command!(BIN_NAME)
    .allow_external_subcommands(true)
    .arg(
      Arg::new("credentials")
        .short('c')
        .long("credentials")
        .value_name("PATH")
        .default_value(DEFAULT_CREDENTIALS_PATH)
        .global(true)
        .help("Path to the service credential file"),
    )
    .subcommand(Add::subcmd())
    .subcommand(Remove::subcmd())
    .subcommand(List::subcmd())
    .subcommand(CreateUser::subcmd())
    .subcommand(Verify::subcmd())
}

pub(super) async fn run_from<I, T>(args: I) -> ToolResult<()>
where
  I: IntoIterator<Item = T>,
  T: Into<OsString> + Clone,
{
  let args = normalize_command_name(args.into_iter().map(Into::into).collect());
  let mut options = build_command();

  let matches = match options.try_get_matches_from_mut(args) {
    Ok(m) => m,
    Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
      print!("{}", e.render());
      return Ok(());
    }
    Err(e) => return Err(ToolError::Usage(e.render().to_string())),
  };

  let Some((name, sub_m)) = matches.subcommand() else {
    println!("{}", options.render_help());
    return Ok(());
  };
  if !KNOWN_COMMANDS.contains(&name) {
    return Err(ToolError::UnknownCommand(name.to_string()));
  }

  let credentials_path = credentials_path(sub_m);
  debug!("Using service credentials at {}", credentials_path.display());
  let state = AppState::init(&credentials_path).await?;
  let res = dispatch(name, sub_m, &state).await;
  state.shutdown().await;
  res
}

async fn dispatch(name: &str, sub_m: &ArgMatches, state: &AppState) -> ToolResult<()> {
  match name {
    "add" => Add::exec_matches(sub_m, state).await,
    "remove" => Remove::exec_matches(sub_m, state).await,
    "list" => List::exec_matches(sub_m, state).await,
    "create-user" => CreateUser::exec_matches(sub_m, state).await,
    "verify" => Verify::exec_matches(sub_m, state).await,
    other => Err(ToolError::UnknownCommand(other.to_string())),
  }
}

/// Global args propagate into known subcommands; external subcommands keep the top-level value
fn credentials_path(sub_m: &ArgMatches) -> PathBuf {
  sub_m
    .try_get_one::<String>("credentials")
    .ok()
    .flatten()
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH))
}

/// Lower-case the command name so that `ADD` and `add` are the same command.
/// Only the first positional argument after the binary name is touched.
fn normalize_command_name(mut args: Vec<OsString>) -> Vec<OsString> {
  let mut idx = 1;
  while idx < args.len() {
    let Some(arg) = args[idx].to_str() else {
      return args;
    };
    match arg {
      "-c" | "--credentials" => idx += 2,
      a if a.starts_with('-') => idx += 1,
      a => {
        let lowered = a.to_lowercase();
        args[idx] = OsString::from(lowered);
        return args;
      }
    }
  }
  args
}
