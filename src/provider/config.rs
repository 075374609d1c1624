//! Provider credentials and endpoint configuration.

// self
use crate::{_prelude::*, auth::ScopeSet};

/// Yahoo authorization endpoint.
pub const AUTHORIZATION_ENDPOINT: &str = "https://api.login.yahoo.com/oauth2/request_auth";
/// Yahoo token endpoint used for code exchanges and refreshes.
pub const TOKEN_ENDPOINT: &str = "https://api.login.yahoo.com/oauth2/get_token";
/// Yahoo social profile endpoint.
pub const PROFILE_ENDPOINT: &str =
	"https://social.yahooapis.com/v1/user/GUID/profile?format=json";

/// Endpoint set used by the provider.
///
/// Defaults to Yahoo's production endpoints. Values stay as strings and are parsed per
/// operation, so invalid overrides surface as errors instead of failing construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEndpoints {
	/// Authorization endpoint the end user is redirected to.
	pub authorization: String,
	/// Token endpoint used for exchanges and refreshes.
	pub token: String,
	/// Profile endpoint queried by `fetch_user`.
	pub profile: String,
}
impl Default for ProviderEndpoints {
	fn default() -> Self {
		Self {
			authorization: AUTHORIZATION_ENDPOINT.into(),
			token: TOKEN_ENDPOINT.into(),
			profile: PROFILE_ENDPOINT.into(),
		}
	}
}

/// Immutable provider configuration: credentials, redirect target, scopes, and endpoints.
///
/// Credentials are not validated locally; the token endpoint is the authority on them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
	/// OAuth 2.0 client identifier (Yahoo "consumer key").
	pub client_key: String,
	/// OAuth 2.0 client secret.
	pub secret: String,
	/// Redirect URI registered with Yahoo.
	pub callback_url: String,
	/// Scopes requested during authorization.
	#[serde(default)]
	pub scopes: ScopeSet,
	/// Endpoint overrides; defaults to Yahoo.
	#[serde(default)]
	pub endpoints: ProviderEndpoints,
}
impl ProviderConfig {
	/// Creates a configuration with no scopes and the default Yahoo endpoints.
	pub fn new(
		client_key: impl Into<String>,
		secret: impl Into<String>,
		callback_url: impl Into<String>,
	) -> Self {
		Self {
			client_key: client_key.into(),
			secret: secret.into(),
			callback_url: callback_url.into(),
			scopes: ScopeSet::default(),
			endpoints: ProviderEndpoints::default(),
		}
	}

	/// Replaces the requested scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = ScopeSet::new(scopes);

		self
	}

	/// Replaces the endpoint set.
	pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}
}
impl Debug for ProviderConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfig")
			.field("client_key", &self.client_key)
			.field("secret_set", &!self.secret.is_empty())
			.field("callback_url", &self.callback_url)
			.field("scopes", &self.scopes)
			.field("endpoints", &self.endpoints)
			.finish()
	}
}
