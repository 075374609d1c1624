#![cfg(feature = "test")]

// crates.io
use httpmock::prelude::*;
// self
use oauth2_yahoo::{
	_preludet::*,
	error::ErrorKind,
	provider::{Provider, ProviderConfig, YahooProvider},
	session::{Session, YahooSession},
};

const TOKEN_PATH: &str = "/oauth2/get_token";
const PROFILE_PATH: &str = "/v1/user/GUID/profile";

fn callback(code: &str) -> HashMap<String, String> {
	HashMap::from([("code".to_owned(), code.to_owned()), ("state".to_owned(), "it".to_owned())])
}

#[tokio::test]
async fn full_login_round_trip() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.form_urlencoded_tuple("grant_type", "authorization_code")
				.form_urlencoded_tuple("code", "code-it")
				.form_urlencoded_tuple("redirect_uri", TEST_CALLBACK_URL);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"access-login\",\"refresh_token\":\"refresh-login\",\"token_type\":\"bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE_PATH).header("authorization", "Bearer access-login");
			then.status(200).body("{\"profile\":{\"nickname\":\"jdoe\",\"guid\":\"123\"}}");
		})
		.await;
	let config = ProviderConfig::new(TEST_CLIENT_KEY, TEST_SECRET, TEST_CALLBACK_URL)
		.with_scopes(["sdps-r"])
		.with_endpoints(test_endpoints(&server.base_url()));
	let provider = YahooProvider::with_http_client(config, test_reqwest_http_client());
	let session = provider.begin_auth("it").expect("Begin auth should succeed.");
	let auth_url = session.auth_url().expect("Session should carry the URL.");

	assert!(auth_url.starts_with(&server.url("/oauth2/request_auth")));
	assert!(auth_url.contains("scope=sdps-r"));

	let stored = session.marshal().expect("Session should encode.");
	let mut restored = provider.unmarshal_session(&stored).expect("Session should decode.");
	let access = restored
		.authorize(&provider, &callback("code-it"))
		.await
		.expect("Code exchange should succeed.");

	token_mock.assert_async().await;

	assert_eq!(access, "access-login");

	let yahoo = restored
		.as_any()
		.downcast_ref::<YahooSession>()
		.expect("Provider should restore Yahoo sessions.");

	assert_eq!(yahoo.refresh_token.expose(), "refresh-login");
	assert!(yahoo.expires_at.is_some());
	assert_eq!(yahoo.auth_url, auth_url);

	let user = provider.fetch_user(restored.as_ref()).await.expect("Profile fetch should succeed.");

	profile_mock.assert_async().await;

	assert_eq!(user.nick_name, "jdoe");
	assert_eq!(user.access_token.expose(), "access-login");
}

#[tokio::test]
async fn authorize_without_code_fails_before_network() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200);
		})
		.await;
	let provider = build_test_provider(&server.base_url());
	let mut session = YahooSession::new("https://example.com/auth");
	let err = session
		.authorize(&provider, &HashMap::<String, String>::new())
		.await
		.expect_err("Missing code must fail.");

	mock.assert_calls_async(0).await;

	assert_eq!(err.kind(), ErrorKind::Exchange);
	assert!(!session.is_authorized());
}

#[tokio::test]
async fn rejected_code_is_an_exchange_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_description\":\"already used\"}");
		})
		.await;
	let provider = build_test_provider(&server.base_url());
	let mut session = YahooSession::new("https://example.com/auth");
	let err = session
		.authorize(&provider, &callback("stale"))
		.await
		.expect_err("Rejected code must fail.");

	mock.assert_calls_async(1).await;

	assert_eq!(err.kind(), ErrorKind::Exchange);
	assert_eq!(err.http_status(), Some(400));
	assert!(!session.is_authorized());
}

#[tokio::test]
async fn empty_access_token_is_rejected() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"\",\"token_type\":\"bearer\"}");
		})
		.await;
	let provider = build_test_provider(&server.base_url());
	let mut session = YahooSession::new("https://example.com/auth");
	let err = session
		.authorize(&provider, &callback("code-it"))
		.await
		.expect_err("Empty access token must fail.");

	mock.assert_calls_async(1).await;

	assert_eq!(err.kind(), ErrorKind::InvalidToken);
	assert!(!session.is_authorized());
}
