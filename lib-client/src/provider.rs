use async_trait::async_trait;
use libcommon::{AuthUser, CustomClaims, ProviderError};

/// End-user side of the identity provider.
///
/// Implementations hold at most one session at a time. The claims returned by
/// [`AuthProvider::id_token_claims`] are the snapshot embedded in the current token and may be
/// stale with respect to the user record until [`AuthProvider::refresh_token`] is called.
#[async_trait]
pub trait AuthProvider: Send + Sync {
  /// Verify email and password and open a session
  async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthUser, ProviderError>;

  /// Claims of the current token without contacting the provider (re-issued only if expired)
  async fn id_token_claims(&self) -> Result<CustomClaims, ProviderError>;

  /// Re-issue the token. With `force`, the current server-side claims are fetched even if the
  /// token is still valid.
  async fn refresh_token(&self, force: bool) -> Result<CustomClaims, ProviderError>;

  /// Terminate the current session. Succeeds when no session exists.
  async fn sign_out(&self) -> Result<(), ProviderError>;

  /// Identity of the current session
  async fn current_user(&self) -> Option<AuthUser>;
}
