//! Yahoo OAuth 2.0 provider adapter: authorization URLs, profile normalization, and token
//! refresh behind a host-agnostic [`Provider`](provider::Provider) capability trait.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod session;
pub mod user;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		http::ReqwestHttpClient,
		provider::{ProviderConfig, ProviderEndpoints, YahooProvider},
	};

	/// Client identifier used by test providers.
	pub const TEST_CLIENT_KEY: &str = "client-key";
	/// Client secret used by test providers.
	pub const TEST_SECRET: &str = "client-secret";
	/// Callback URL used by test providers.
	pub const TEST_CALLBACK_URL: &str = "https://app.example.com/auth/yahoo/callback";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Endpoints rooted at a mock server base URL (e.g. `http://127.0.0.1:1234`).
	pub fn test_endpoints(base: &str) -> ProviderEndpoints {
		ProviderEndpoints {
			authorization: format!("{base}/oauth2/request_auth"),
			token: format!("{base}/oauth2/get_token"),
			profile: format!("{base}/v1/user/GUID/profile?format=json"),
		}
	}

	/// Constructs a [`YahooProvider`] whose endpoints point at the provided mock server base.
	pub fn build_test_provider(base: &str) -> YahooProvider {
		let config = ProviderConfig::new(TEST_CLIENT_KEY, TEST_SECRET, TEST_CALLBACK_URL)
			.with_endpoints(test_endpoints(base));

		YahooProvider::with_http_client(config, test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		any::Any,
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use color_eyre as _;
