//! Per-login session state handed back and forth with the host framework.
//!
//! Hosts hold sessions as `Box<dyn Session>` between the redirect and the callback and
//! persist them through [`Session::marshal`] / [`Provider::unmarshal_session`].

// std
use std::str::FromStr;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::DecodeError,
	provider::{Provider, ProviderFuture, YahooProvider},
};

/// Callback query parameters as seen by [`Session::authorize`].
pub trait Params: Send + Sync {
	/// Returns the first value stored under `key`.
	fn get(&self, key: &str) -> Option<&str>;
}
impl Params for HashMap<String, String> {
	fn get(&self, key: &str) -> Option<&str> {
		HashMap::get(self, key).map(String::as_str)
	}
}
impl Params for Vec<(String, String)> {
	fn get(&self, key: &str) -> Option<&str> {
		self.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
	}
}

/// Opaque per-login state owned by the host between redirect and callback.
pub trait Session: Send + Sync + Debug {
	/// Returns the authorization URL stored by `begin_auth`.
	fn auth_url(&self) -> Result<String>;

	/// Serializes the session to the text accepted by `unmarshal_session`.
	fn marshal(&self) -> Result<String>;

	/// Exchanges the callback's `code` for tokens, stores them, and returns the access token.
	fn authorize<'a>(
		&'a mut self,
		provider: &'a dyn Provider,
		params: &'a dyn Params,
	) -> ProviderFuture<'a, Result<String>>;

	/// Downcast support so providers can recover their concrete session.
	fn as_any(&self) -> &dyn Any;
}

/// Yahoo login state.
///
/// Only `auth_url` is set after `begin_auth`; the token fields are filled once the code
/// exchange completes. The JSON form uses the field names as keys and RFC 3339 for
/// `expires_at`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YahooSession {
	/// Authorization URL the end user is redirected to.
	pub auth_url: String,
	/// Access token obtained from the code exchange.
	pub access_token: TokenSecret,
	/// Refresh token obtained from the code exchange.
	pub refresh_token: TokenSecret,
	/// Access token expiry.
	#[serde(with = "time::serde::rfc3339::option")]
	pub expires_at: Option<OffsetDateTime>,
}
impl YahooSession {
	/// Creates a session that only carries the authorization URL.
	pub fn new(auth_url: impl Into<String>) -> Self {
		Self { auth_url: auth_url.into(), ..Default::default() }
	}

	/// Returns `true` once the code exchange stored an access token.
	pub fn is_authorized(&self) -> bool {
		!self.access_token.is_empty()
	}

	async fn exchange(&mut self, provider: &YahooProvider, params: &dyn Params) -> Result<String> {
		let code = params.get("code").filter(|code| !code.is_empty()).ok_or(Error::MissingCode)?;
		let token = provider.exchange(code).await?;

		self.access_token = token.access_token.clone();
		self.refresh_token = token.refresh_token.unwrap_or_default();
		self.expires_at = token.expires_at;

		Ok(token.access_token.expose().to_owned())
	}
}
impl Session for YahooSession {
	fn auth_url(&self) -> Result<String> {
		if self.auth_url.is_empty() {
			return Err(Error::MissingAuthUrl);
		}

		Ok(self.auth_url.clone())
	}

	fn marshal(&self) -> Result<String> {
		serde_json::to_string(self).map_err(|source| Error::Encode { source })
	}

	fn authorize<'a>(
		&'a mut self,
		provider: &'a dyn Provider,
		params: &'a dyn Params,
	) -> ProviderFuture<'a, Result<String>> {
		let provider = provider.as_any().downcast_ref::<YahooProvider>();

		Box::pin(async move {
			let provider = provider.ok_or(Error::SessionMismatch { expected: "YahooProvider" })?;

			self.exchange(provider, params).await
		})
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}
impl FromStr for YahooSession {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		serde_json::from_str(s).map_err(|source| DecodeError::Session { source }.into())
	}
}
impl Display for YahooSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;

		f.write_str(&json)
	}
}
