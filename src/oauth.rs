//! OAuth 2.0 client facade over the `oauth2` crate.
//!
//! The facade owns a configured [`BasicClient`] bound to the provider endpoints and turns
//! `oauth2` results into adapter [`Token`] values and [`TokenEndpointError`]s. It is rebuilt
//! per operation from the immutable [`ProviderConfig`], so the provider never holds a
//! half-validated client.

pub use oauth2;

// crates.io
use oauth2::{
	AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
	HttpClientError, RedirectUrl, RefreshToken, RequestTokenError, Scope, TokenResponse,
	TokenUrl,
	basic::{BasicClient, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, Token, TokenBuilderError},
	error::TokenEndpointError,
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::ProviderConfig,
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Token endpoint grants issued by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantType {
	/// Authorization Code grant performed after the redirect.
	AuthorizationCode,
	/// Refresh Token grant.
	RefreshToken,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::RefreshToken => "refresh_token",
		}
	}

	fn wrap(self, err: TokenEndpointError) -> Error {
		match self {
			GrantType::AuthorizationCode => Error::Exchange(err),
			GrantType::RefreshToken => Error::Refresh(err),
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

pub(crate) struct OAuthFacade<'a> {
	oauth_client: ConfiguredBasicClient,
	http_client: &'a ReqwestHttpClient,
}
impl<'a> OAuthFacade<'a> {
	pub(crate) fn from_config(
		config: &ProviderConfig,
		http_client: &'a ReqwestHttpClient,
	) -> Result<Self> {
		let auth_url = AuthUrl::new(config.endpoints.authorization.clone())
			.map_err(|source| Error::url("authorization", source))?;
		let token_url = TokenUrl::new(config.endpoints.token.clone())
			.map_err(|source| Error::url("token", source))?;
		let mut oauth_client = BasicClient::new(ClientId::new(config.client_key.clone()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url);

		if !config.secret.is_empty() {
			oauth_client = oauth_client.set_client_secret(ClientSecret::new(config.secret.clone()));
		}
		if !config.callback_url.is_empty() {
			let redirect_url = RedirectUrl::new(config.callback_url.clone())
				.map_err(|source| Error::url("redirect", source))?;

			oauth_client = oauth_client.set_redirect_uri(redirect_url);
		}

		Ok(Self { oauth_client, http_client })
	}

	/// Builds the authorization-code URL carrying the host-supplied `state`.
	pub(crate) fn authorize_url(&self, scope: &ScopeSet, state: &str) -> Url {
		let (url, _state) = self
			.oauth_client
			.authorize_url(|| CsrfToken::new(state.to_owned()))
			.add_scopes(scope.iter().map(|value| Scope::new(value.to_owned())))
			.url();

		url
	}

	pub(crate) async fn exchange_code(&self, code: &str) -> Result<Token> {
		const GRANT: GrantType = GrantType::AuthorizationCode;

		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let response = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.request_async(&instrumented)
			.await
			.map_err(|err| GRANT.wrap(map_request_error(meta.take(), err)))?;
		let status = meta.take().and_then(|value| value.status);

		map_token_response(response, None).map_err(|source| match source {
			TokenBuilderError::MissingAccessToken => Error::InvalidToken,
			source => GRANT.wrap(TokenEndpointError::InvalidToken { source, status }),
		})
	}

	pub(crate) async fn refresh_token(&self, refresh_token: &str) -> Result<Token> {
		const GRANT: GrantType = GrantType::RefreshToken;

		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let refresh_secret = RefreshToken::new(refresh_token.to_owned());
		let response = self
			.oauth_client
			.exchange_refresh_token(&refresh_secret)
			.request_async(&instrumented)
			.await
			.map_err(|err| GRANT.wrap(map_request_error(meta.take(), err)))?;
		let status = meta.take().and_then(|value| value.status);

		map_token_response(response, Some(refresh_token))
			.map_err(|source| GRANT.wrap(TokenEndpointError::InvalidToken { source, status }))
	}
}

/// Converts a token endpoint response, keeping `fallback_refresh` when the provider does not
/// rotate the refresh token.
fn map_token_response(
	response: BasicTokenResponse,
	fallback_refresh: Option<&str>,
) -> Result<Token, TokenBuilderError> {
	let token_type: &str = response.token_type().as_ref();
	let mut builder = Token::builder()
		.access_token(response.access_token().secret().to_owned())
		.token_type(token_type.to_ascii_lowercase())
		.issued_at(OffsetDateTime::now_utc());

	if let Some(expires_in) = response.expires_in() {
		builder = builder.expires_in(Duration::try_from(expires_in).unwrap_or(Duration::MAX));
	}

	let refresh = response
		.refresh_token()
		.map(|token| token.secret().to_owned())
		.filter(|value| !value.is_empty())
		.or_else(|| fallback_refresh.map(str::to_owned));

	if let Some(refresh) = refresh {
		builder = builder.refresh_token(refresh);
	}

	builder.build()
}

fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> TokenEndpointError {
	let status = meta.as_ref().and_then(|value| value.status);
	let retry_after = meta.as_ref().and_then(|value| value.retry_after);

	match err {
		RequestTokenError::ServerResponse(response) => TokenEndpointError::OAuth {
			error: response.error().as_ref().to_string(),
			description: response.error_description().cloned(),
			status,
		},
		RequestTokenError::Request(error) => map_transport_error(error, status, retry_after),
		RequestTokenError::Parse(source, _body) => TokenEndpointError::Parse { source, status },
		RequestTokenError::Other(message) =>
			TokenEndpointError::Unexpected { message, status, retry_after },
	}
}

fn map_transport_error(
	err: HttpClientError<ReqwestError>,
	status: Option<u16>,
	retry_after: Option<Duration>,
) -> TokenEndpointError {
	match err {
		HttpClientError::Reqwest(inner) => TokenEndpointError::network(*inner),
		HttpClientError::Http(inner) => TokenEndpointError::Request(inner),
		HttpClientError::Io(inner) => TokenEndpointError::Io(inner),
		HttpClientError::Other(message) =>
			TokenEndpointError::Unexpected { message, status, retry_after },
		_ => TokenEndpointError::Unexpected {
			message: "HTTP client error occurred while calling the token endpoint".into(),
			status,
			retry_after,
		},
	}
}
