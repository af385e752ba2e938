mod auth_state;
mod constants;
mod error;
mod guard;
mod log;
mod message;
mod provider;
mod session;
mod subscription;

pub use auth_state::{AuthSnapshot, AuthState};
pub use constants::LOGIN_PATH;
pub use error::{AuthError, AuthResult};
pub use guard::{decide, decide_snapshot, GuardDecision};
pub use provider::AuthProvider;
pub use session::{SessionResolver, SessionState};
pub use subscription::Subscription;
