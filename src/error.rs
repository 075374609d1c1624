//! Adapter-level error types shared across the provider, sessions, and the OAuth facade.

// self
use crate::{_prelude::*, auth::TokenBuilderError, user::User};

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse classification of every [`Error`] so hosts can branch without matching variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Authorization or endpoint URL could not be built.
	UrlConstruction,
	/// Profile request failed at the network layer or returned a non-2xx status.
	Transport,
	/// Profile or session JSON could not be decoded.
	Decode,
	/// Session could not be encoded as JSON.
	Encode,
	/// Refresh token grant failed.
	Refresh,
	/// Authorization code exchange failed.
	Exchange,
	/// Token endpoint returned an unusable token.
	InvalidToken,
	/// Session has not been started with an authorization URL.
	MissingAuthUrl,
	/// A session or provider belonging to another identity service was supplied.
	SessionMismatch,
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::UrlConstruction => "url_construction",
			ErrorKind::Transport => "transport",
			ErrorKind::Decode => "decode",
			ErrorKind::Encode => "encode",
			ErrorKind::Refresh => "refresh",
			ErrorKind::Exchange => "exchange",
			ErrorKind::InvalidToken => "invalid_token",
			ErrorKind::MissingAuthUrl => "missing_auth_url",
			ErrorKind::SessionMismatch => "session_mismatch",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Canonical adapter error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// A configured URL could not be parsed.
	#[error("The {target} URL is invalid.")]
	UrlConstruction {
		/// Which URL failed to parse (authorization, token, redirect, profile).
		target: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Profile endpoint could not be reached or rejected the request.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Profile or session payload could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Session could not be serialized.
	#[error("Session could not be encoded as JSON.")]
	Encode {
		/// Serializer failure.
		#[source]
		source: serde_json::Error,
	},
	/// Refresh token grant failed; the token endpoint error is preserved as the source.
	#[error("Token refresh failed.")]
	Refresh(#[source] TokenEndpointError),
	/// Authorization code exchange failed at the token endpoint.
	#[error("Authorization code exchange failed.")]
	Exchange(#[source] TokenEndpointError),
	/// Callback parameters did not include an authorization code.
	#[error("Callback parameters are missing the authorization code.")]
	MissingCode,
	/// Token endpoint answered without an access token.
	#[error("Token endpoint returned an empty access token.")]
	InvalidToken,
	/// Session was never populated by `begin_auth`.
	#[error("Session has no authorization URL.")]
	MissingAuthUrl,
	/// Caller passed a session or provider that belongs to another identity service.
	#[error("Expected a {expected} value from the yahoo provider.")]
	SessionMismatch {
		/// The concrete type the adapter expected.
		expected: &'static str,
	},
}
impl Error {
	/// Returns the coarse classification for the error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::UrlConstruction { .. } => ErrorKind::UrlConstruction,
			Self::Transport(_) => ErrorKind::Transport,
			Self::Decode(_) => ErrorKind::Decode,
			Self::Encode { .. } => ErrorKind::Encode,
			Self::Refresh(_) => ErrorKind::Refresh,
			Self::Exchange(_) | Self::MissingCode => ErrorKind::Exchange,
			Self::InvalidToken => ErrorKind::InvalidToken,
			Self::MissingAuthUrl => ErrorKind::MissingAuthUrl,
			Self::SessionMismatch { .. } => ErrorKind::SessionMismatch,
		}
	}

	/// HTTP status of the failing upstream response, when one was received.
	pub fn http_status(&self) -> Option<u16> {
		match self {
			Self::Transport(TransportError::Status { status }) => Some(*status),
			Self::Refresh(err) | Self::Exchange(err) => err.status(),
			_ => None,
		}
	}

	pub(crate) fn url(target: &'static str, source: url::ParseError) -> Self {
		Self::UrlConstruction { target, source }
	}
}

/// Transport-level failures raised while calling the profile endpoint.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Request could not be built or the network call failed.
	#[error("Network error occurred while calling the profile endpoint.")]
	Network {
		/// Underlying reqwest failure.
		#[source]
		source: ReqwestError,
	},
	/// Profile endpoint answered with a non-success status.
	#[error("Profile endpoint returned HTTP status {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
}
impl From<ReqwestError> for TransportError {
	fn from(source: ReqwestError) -> Self {
		Self::Network { source }
	}
}

/// Decoding failures for provider payloads and persisted sessions.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Profile endpoint returned JSON that does not match the expected shape.
	#[error("Profile endpoint returned malformed JSON at `{path}`.", path = .source.path())]
	Profile {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Profile JSON parsed but a container is not an object.
	#[error("Profile endpoint returned a non-object value at `{path}`.")]
	UnexpectedShape {
		/// JSON path of the offending value.
		path: &'static str,
	},
	/// Serialized session text is not a valid session.
	#[error("Session payload could not be decoded.")]
	Session {
		/// Underlying JSON failure.
		#[source]
		source: serde_json::Error,
	},
}

/// Token endpoint failures surfaced verbatim from the OAuth 2.0 client.
#[derive(Debug, ThisError)]
pub enum TokenEndpointError {
	/// Provider returned a standard OAuth error body.
	#[error("Token endpoint returned an OAuth error: {error}.")]
	OAuth {
		/// OAuth `error` code.
		error: String,
		/// OAuth `error_description`, when supplied.
		description: Option<String>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error("Token request could not be constructed.")]
	Request(#[source] oauth2::http::Error),
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[source] std::io::Error),
	/// Token endpoint responded with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint answered successfully but the token could not be used.
	#[error("Token endpoint returned an unusable token.")]
	InvalidToken {
		/// Why the token was rejected.
		#[source]
		source: TokenBuilderError,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Refresh was requested without a refresh token; no request is sent.
	#[error("Refresh token is not set.")]
	MissingRefreshToken,
	/// Any other failure reported by the OAuth client or transport.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	Unexpected {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
}
impl TokenEndpointError {
	/// HTTP status observed for the failing request, when known.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::OAuth { status, .. }
			| Self::Parse { status, .. }
			| Self::InvalidToken { status, .. }
			| Self::Unexpected { status, .. } => *status,
			Self::Network { .. } | Self::Request(_) | Self::Io(_) | Self::MissingRefreshToken =>
				None,
		}
	}

	/// OAuth `error` code returned by the provider, when the failure carried one.
	pub fn oauth_error(&self) -> Option<&str> {
		match self {
			Self::OAuth { error, .. } => Some(error),
			_ => None,
		}
	}

	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

/// Failure from [`Provider::fetch_user`](crate::provider::Provider::fetch_user) that still
/// carries the partially populated [`User`].
///
/// Token fields are always filled from the session; profile fields stay empty. Hosts decide
/// whether the partial record is good enough to continue.
#[derive(Debug, ThisError)]
#[error("Failed to fetch the user profile.")]
pub struct FetchUserError {
	/// User record populated up to the point of failure.
	pub user: User,
	/// Underlying failure.
	#[source]
	pub error: Error,
}
impl FetchUserError {
	/// Creates a new error from the partial record and its cause.
	pub fn new(user: User, error: impl Into<Error>) -> Self {
		Self { user, error: error.into() }
	}

	/// Returns the classification of the underlying failure.
	pub fn kind(&self) -> ErrorKind {
		self.error.kind()
	}

	/// Splits the error into the partial record and the cause.
	pub fn into_parts(self) -> (User, Error) {
		(self.user, self.error)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kinds_cover_exchange_variants() {
		assert_eq!(Error::MissingCode.kind(), ErrorKind::Exchange);
		assert_eq!(
			Error::Exchange(TokenEndpointError::Unexpected {
				message: "boom".into(),
				status: Some(502),
				retry_after: None,
			})
			.kind(),
			ErrorKind::Exchange
		);
		assert_eq!(Error::MissingAuthUrl.kind(), ErrorKind::MissingAuthUrl);
	}

	#[test]
	fn token_endpoint_error_exposes_status() {
		let err = TokenEndpointError::OAuth {
			error: "invalid_grant".into(),
			description: None,
			status: Some(400),
		};

		assert_eq!(err.status(), Some(400));
		assert_eq!(err.oauth_error(), Some("invalid_grant"));
		assert_eq!(err.to_string(), "Token endpoint returned an OAuth error: invalid_grant.");
	}

	#[test]
	fn http_status_follows_upstream_response() {
		assert_eq!(Error::from(TransportError::Status { status: 503 }).http_status(), Some(503));
		assert_eq!(
			Error::Refresh(TokenEndpointError::InvalidToken {
				source: TokenBuilderError::MissingAccessToken,
				status: Some(200),
			})
			.http_status(),
			Some(200)
		);
		assert_eq!(Error::Refresh(TokenEndpointError::MissingRefreshToken).http_status(), None);
		assert_eq!(Error::MissingAuthUrl.http_status(), None);
		assert_eq!(ErrorKind::SessionMismatch.to_string(), "session_mismatch");
	}

	#[test]
	fn fetch_user_error_keeps_partial_record() {
		let user = User { access_token: "access".into(), ..User::new("yahoo") };
		let err = FetchUserError::new(user, TransportError::Status { status: 503 });

		assert_eq!(err.kind(), ErrorKind::Transport);

		let (user, error) = err.into_parts();

		assert_eq!(user.access_token.expose(), "access");
		assert!(matches!(error, Error::Transport(TransportError::Status { status: 503 })));
	}
}
