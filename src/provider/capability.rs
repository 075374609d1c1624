//! Capability trait shared by every provider a host framework can register.
//!
//! Hosts keep providers behind `Arc<dyn Provider>` and sessions behind `Box<dyn Session>`;
//! each implementation recovers its concrete session type through [`Session::as_any`].

// self
use crate::{
	_prelude::*,
	auth::Token,
	error::FetchUserError,
	session::Session,
	user::User,
};

/// Boxed future returned by the network-bound [`Provider`] operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Operations a host authentication framework expects from an identity provider.
///
/// Every call is a single attempt; implementations never retry, cache, or keep per-login
/// state. The provider is read-only after construction, so hosts may share one instance
/// across concurrent logins.
pub trait Provider: Send + Sync {
	/// Stable key the host uses to look this provider up.
	fn name(&self) -> &str;

	/// Toggles provider debug output. Present for interface parity only.
	fn debug(&self, debug: bool);

	/// Starts a login attempt, returning a session carrying the authorization URL.
	fn begin_auth(&self, state: &str) -> Result<Box<dyn Session>>;

	/// Fetches and normalizes the profile for a session that already holds an access token.
	///
	/// Failures still return the partially populated record through [`FetchUserError`].
	fn fetch_user<'a>(
		&'a self,
		session: &'a dyn Session,
	) -> ProviderFuture<'a, Result<User, FetchUserError>>;

	/// Restores a session previously produced by [`Session::marshal`].
	fn unmarshal_session(&self, data: &str) -> Result<Box<dyn Session>>;

	/// Whether [`Provider::refresh_token`] is supported.
	fn refresh_token_available(&self) -> bool;

	/// Exchanges a refresh token for a new token.
	fn refresh_token<'a>(&'a self, refresh_token: &'a str) -> ProviderFuture<'a, Result<Token>>;

	/// Downcast support so sessions can reach their concrete provider.
	fn as_any(&self) -> &dyn Any;
}
