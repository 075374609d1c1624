//! Walks through starting a Yahoo login and persisting the session across the redirect hop.

// std
use std::{collections::HashMap, env};
// crates.io
use color_eyre::Result;
// self
use oauth2_yahoo::provider::{Provider, YahooProvider};

fn main() -> Result<()> {
	color_eyre::install()?;

	let client_key = env::var("YAHOO_CLIENT_KEY").unwrap_or_else(|_| "demo-client".into());
	let secret = env::var("YAHOO_SECRET").unwrap_or_else(|_| "demo-secret".into());
	let provider = YahooProvider::new(
		client_key,
		secret,
		"https://app.example.com/auth/yahoo/callback",
		["sdps-r"],
	);
	let state = "demo-state-123";
	let session = provider.begin_auth(state)?;

	println!("Send your user to {}.", session.auth_url()?);

	let mut persisted: HashMap<String, String> = HashMap::new();

	persisted.insert(state.to_owned(), session.marshal()?);

	// Simulate the callback handler restoring the session by `state`.
	match persisted.remove(state) {
		Some(stored) => {
			let restored = provider.unmarshal_session(&stored)?;

			println!("Restored {} session pointing at {}.", provider.name(), restored.auth_url()?);
			println!("Call Session::authorize with the callback parameters, then Provider::fetch_user.");
		},
		None => eprintln!("State `{state}` was not recognized."),
	}

	Ok(())
}
