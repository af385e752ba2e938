mod admin;
mod argon2;
mod config;
mod constants;
mod credentials;
mod error;
mod log;
mod provider;
mod secret;
mod state;
mod table;

use crate::{constants::*, error::*, log::init_logger};
use config::parse_opts;
use tokio::runtime::Builder;

fn main() -> Result<()> {
  init_logger();

  let mut runtime_builder = Builder::new_multi_thread();
  runtime_builder.enable_all();
  runtime_builder.thread_name(THREAD_NAME);
  let runtime = runtime_builder.build()?;

  let res = runtime.block_on(parse_opts());
  // the runtime must be gone before exiting the process
  drop(runtime);

  if let Err(e) = res {
    eprintln!("Error: {e}");
    if let Some(guidance) = e.guidance() {
      eprintln!("{guidance}");
    }
    std::process::exit(e.exit_code());
  }
  Ok(())
}
