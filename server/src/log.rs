pub use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Diagnostics go to stderr so that command output on stdout stays clean.
/// Verbosity follows `RUST_LOG`, warnings only when unset.
pub fn init_logger() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let format = fmt::format()
    .with_target(false)
    .with_level(true)
    .without_time()
    .compact();
  tracing_subscriber::fmt()
    .event_format(format)
    .with_writer(std::io::stderr)
    .with_env_filter(filter)
    .init();
}
