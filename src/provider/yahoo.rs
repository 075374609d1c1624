//! Yahoo binding of the [`Provider`] capability.

// self
use crate::{
	_prelude::*,
	auth::Token,
	error::{FetchUserError, TokenEndpointError},
	http::ReqwestHttpClient,
	oauth::OAuthFacade,
	obs::{self, FlowKind},
	provider::{Provider, ProviderConfig, ProviderFuture},
	session::{Session, YahooSession},
	user::{self, User},
};

/// Provider name reported to the host and stamped on every [`User`].
pub const PROVIDER_NAME: &str = "yahoo";

/// Yahoo OAuth 2.0 provider.
///
/// Holds only immutable configuration and a pooled HTTP client, so one instance can serve
/// any number of concurrent logins.
#[derive(Clone, Debug)]
pub struct YahooProvider {
	config: ProviderConfig,
	http_client: ReqwestHttpClient,
}
impl YahooProvider {
	/// Creates a provider against Yahoo's production endpoints.
	///
	/// Nothing is validated here; malformed URLs surface from the operation that uses them.
	pub fn new<I, S>(
		client_key: impl Into<String>,
		secret: impl Into<String>,
		callback_url: impl Into<String>,
		scopes: I,
	) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::from_config(ProviderConfig::new(client_key, secret, callback_url).with_scopes(scopes))
	}

	/// Creates a provider from a prepared configuration and the default HTTP client.
	pub fn from_config(config: ProviderConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}

	/// Creates a provider that issues every request through `http_client`.
	pub fn with_http_client(config: ProviderConfig, http_client: ReqwestHttpClient) -> Self {
		Self { config, http_client }
	}

	/// Configuration the provider was built with.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	/// Builds the authorization URL for `state` and wraps it in a fresh session.
	pub fn begin(&self, state: &str) -> Result<YahooSession> {
		const KIND: FlowKind = FlowKind::BeginAuth;

		let span = obs::start_flow(KIND, "begin");
		let _guard = span.entered();
		let result = OAuthFacade::from_config(&self.config, &self.http_client).map(|facade| {
			YahooSession::new(facade.authorize_url(&self.config.scopes, state))
		});

		obs::finish_flow(&span, KIND, result.as_ref().err());

		result
	}

	/// Fetches the profile for `session` and normalizes it into a [`User`].
	pub async fn fetch_profile(&self, session: &YahooSession) -> Result<User, FetchUserError> {
		const KIND: FlowKind = FlowKind::FetchUser;

		let span = obs::start_flow(KIND, "fetch_profile");
		let result = span
			.instrument(async move {
				let mut user = User {
					access_token: session.access_token.clone(),
					refresh_token: session.refresh_token.clone(),
					expires_at: session.expires_at,
					..User::new(PROVIDER_NAME)
				};
				let body = match self
					.http_client
					.get_bearer(&self.config.endpoints.profile, session.access_token.expose())
					.await
				{
					Ok(body) => body,
					Err(e) => return Err(FetchUserError::new(user, e)),
				};

				match user::apply_profile(&mut user, &body) {
					Ok(()) => Ok(user),
					Err(e) => Err(FetchUserError::new(user, e)),
				}
			})
			.await;

		obs::finish_flow(&span, KIND, result.as_ref().err().map(|e| &e.error));

		result
	}

	/// Decodes a session previously produced by [`Session::marshal`].
	pub fn parse_session(&self, data: &str) -> Result<YahooSession> {
		data.parse()
	}

	/// Exchanges a refresh token for a new [`Token`].
	///
	/// An empty `refresh_token` fails locally without contacting the token endpoint. When the
	/// response omits a refresh token the supplied one is carried over.
	pub async fn refresh(&self, refresh_token: &str) -> Result<Token> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = obs::start_flow(KIND, "refresh");
		let result = span
			.instrument(async move {
				if refresh_token.is_empty() {
					return Err(Error::Refresh(TokenEndpointError::MissingRefreshToken));
				}

				OAuthFacade::from_config(&self.config, &self.http_client)?
					.refresh_token(refresh_token)
					.await
			})
			.await;

		obs::finish_flow(&span, KIND, result.as_ref().err());

		result
	}

	/// Exchanges an authorization code for a [`Token`].
	pub async fn exchange(&self, code: &str) -> Result<Token> {
		const KIND: FlowKind = FlowKind::Exchange;

		let span = obs::start_flow(KIND, "exchange");
		let result = span
			.instrument(async move {
				OAuthFacade::from_config(&self.config, &self.http_client)?.exchange_code(code).await
			})
			.await;

		obs::finish_flow(&span, KIND, result.as_ref().err());

		result
	}
}
impl Provider for YahooProvider {
	fn name(&self) -> &str {
		PROVIDER_NAME
	}

	fn debug(&self, _debug: bool) {}

	fn begin_auth(&self, state: &str) -> Result<Box<dyn Session>> {
		Ok(Box::new(self.begin(state)?))
	}

	fn fetch_user<'a>(
		&'a self,
		session: &'a dyn Session,
	) -> ProviderFuture<'a, Result<User, FetchUserError>> {
		let session = session.as_any().downcast_ref::<YahooSession>();

		Box::pin(async move {
			let Some(session) = session else {
				return Err(FetchUserError::new(
					User::new(PROVIDER_NAME),
					Error::SessionMismatch { expected: "YahooSession" },
				));
			};

			self.fetch_profile(session).await
		})
	}

	fn unmarshal_session(&self, data: &str) -> Result<Box<dyn Session>> {
		Ok(Box::new(self.parse_session(data)?))
	}

	fn refresh_token_available(&self) -> bool {
		true
	}

	fn refresh_token<'a>(&'a self, refresh_token: &'a str) -> ProviderFuture<'a, Result<Token>> {
		Box::pin(self.refresh(refresh_token))
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}
