use libcommon::ProviderError;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Describes things that can go wrong while establishing an admin session
#[derive(Debug, Error)]
pub enum AuthError {
  /// Credentials were valid but the identity does not hold the admin claim.
  /// The session has already been signed out when this is returned.
  #[error("{message}")]
  NotAuthorized { message: String },

  /// The provider rejected the sign-in. `message` is meant for the end user.
  #[error("{message}")]
  SignInFailed { code: String, message: String },

  #[error("Identity provider error: {0}")]
  Provider(#[from] ProviderError),

  // black hole
  #[error(transparent)]
  Other(#[from] anyhow::Error),
}
