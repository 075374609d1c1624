#![cfg(feature = "test")]

// crates.io
use httpmock::prelude::*;
// self
use oauth2_yahoo::{
	_preludet::*,
	auth::TokenBuilderError,
	error::{ErrorKind, TokenEndpointError},
	provider::Provider,
};

const TOKEN_PATH: &str = "/oauth2/get_token";
const BASIC_CREDENTIALS: &str = "Basic Y2xpZW50LWtleTpjbGllbnQtc2VjcmV0";

#[tokio::test]
async fn refresh_sends_only_the_refresh_grant() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/x-www-form-urlencoded")
				.header("authorization", BASIC_CREDENTIALS)
				.form_urlencoded_tuple("grant_type", "refresh_token")
				.form_urlencoded_tuple("refresh_token", "refresh-old")
				.form_urlencoded_tuple_missing("access_token")
				.form_urlencoded_tuple_missing("code");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"access-new\",\"refresh_token\":\"refresh-new\",\"token_type\":\"bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let provider = build_test_provider(&server.base_url());

	assert!(provider.refresh_token_available());

	let issued_before = OffsetDateTime::now_utc();
	let token = provider.refresh_token("refresh-old").await.expect("Refresh should succeed.");

	mock.assert_async().await;

	assert_eq!(token.access_token.expose(), "access-new");
	assert_eq!(token.token_type, "bearer");
	assert_eq!(token.refresh_token.as_ref().map(|t| t.expose()), Some("refresh-new"));
	assert!(
		token
			.expires_at
			.is_some_and(|expiry| expiry >= issued_before + Duration::seconds(3600))
	);
}

#[tokio::test]
async fn refresh_keeps_supplied_token_when_not_rotated() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"access-new\",\"token_type\":\"Bearer\"}");
		})
		.await;

	let token = build_test_provider(&server.base_url())
		.refresh_token("refresh-old")
		.await
		.expect("Refresh should succeed without rotation.");

	assert_eq!(token.refresh_token.as_ref().map(|t| t.expose()), Some("refresh-old"));
	assert_eq!(token.token_type, "bearer");
	assert!(token.expires_at.is_none());
}

#[tokio::test]
async fn refresh_surfaces_oauth_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_description\":\"revoked\"}");
		})
		.await;
	let err = build_test_provider(&server.base_url())
		.refresh_token("revoked")
		.await
		.expect_err("Revoked refresh token must fail.");

	mock.assert_calls_async(1).await;

	assert_eq!(err.kind(), ErrorKind::Refresh);

	let Error::Refresh(source) = &err else {
		panic!("Expected a refresh error, got {err:?}.");
	};

	assert_eq!(source.oauth_error(), Some("invalid_grant"));
	assert_eq!(source.status(), Some(400));
}

#[tokio::test]
async fn refresh_with_empty_access_token_is_a_refresh_error() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"\",\"token_type\":\"bearer\"}");
		})
		.await;

	let err = build_test_provider(&server.base_url())
		.refresh_token("refresh-old")
		.await
		.expect_err("Empty access token must fail the refresh.");

	assert_eq!(err.kind(), ErrorKind::Refresh);
	assert!(matches!(
		err,
		Error::Refresh(TokenEndpointError::InvalidToken {
			source: TokenBuilderError::MissingAccessToken,
			status: Some(200),
		})
	));
}

#[tokio::test]
async fn refresh_with_oversized_lifetime_is_a_refresh_error() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"access-new\",\"token_type\":\"bearer\",\"expires_in\":9223372036854775807}",
			);
		})
		.await;

	let err = build_test_provider(&server.base_url())
		.refresh_token("refresh-old")
		.await
		.expect_err("Overflowing lifetime must fail the refresh.");

	assert_eq!(err.kind(), ErrorKind::Refresh);
	assert!(matches!(
		err,
		Error::Refresh(TokenEndpointError::InvalidToken {
			source: TokenBuilderError::ExpiryOverflow { .. },
			..
		})
	));
}
