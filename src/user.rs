//! Normalized user record and the Yahoo profile wire shape.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, auth::TokenSecret, error::DecodeError};

/// Provider-neutral user record handed back to the host framework.
///
/// Only the fields Yahoo's profile endpoint supplies are populated; the rest keep their
/// empty defaults. `email` in particular is always empty because the profile endpoint does
/// not expose it.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
	/// Decoded `profile` object exactly as the provider returned it.
	pub raw_data: Map<String, Value>,
	/// Name of the provider that produced the record.
	pub provider: String,
	/// Email address (never provided by Yahoo).
	pub email: String,
	/// Display name.
	pub name: String,
	/// Given name (not provided).
	pub first_name: String,
	/// Family name (not provided).
	pub last_name: String,
	/// Nickname.
	pub nick_name: String,
	/// Free-form description (not provided).
	pub description: String,
	/// Provider-scoped user identifier (Yahoo GUID).
	pub user_id: String,
	/// Avatar image URL.
	pub avatar_url: String,
	/// Free-form location.
	pub location: String,
	/// Access token carried over from the session.
	pub access_token: TokenSecret,
	/// OAuth 1.0a token secret (unused by OAuth 2.0 providers).
	pub access_token_secret: TokenSecret,
	/// Refresh token carried over from the session.
	pub refresh_token: TokenSecret,
	/// Access token expiry carried over from the session.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub expires_at: Option<OffsetDateTime>,
	/// OpenID Connect ID token (not provided).
	pub id_token: TokenSecret,
}
impl User {
	/// Creates an empty record tagged with the provider name.
	pub fn new(provider: impl Into<String>) -> Self {
		Self { provider: provider.into(), ..Default::default() }
	}
}
impl Debug for User {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("User")
			.field("provider", &self.provider)
			.field("user_id", &self.user_id)
			.field("name", &self.name)
			.field("nick_name", &self.nick_name)
			.field("location", &self.location)
			.field("avatar_url", &self.avatar_url)
			.field("email", &self.email)
			.field("access_token", &self.access_token)
			.field("refresh_token", &self.refresh_token)
			.field("expires_at", &self.expires_at)
			.finish_non_exhaustive()
	}
}

#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
	profile: Option<Profile>,
}

#[derive(Debug, Default, Deserialize)]
struct Profile {
	nickname: Option<String>,
	location: Option<String>,
	guid: Option<String>,
	image: Option<ProfileImage>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileImage {
	#[serde(rename = "imageURL")]
	image_url: Option<String>,
}

/// Decodes a profile response body into `user`.
///
/// Absent or `null` fields become empty strings. On error `user` is left untouched.
pub(crate) fn apply_profile(user: &mut User, body: &[u8]) -> Result<(), DecodeError> {
	let value: Value =
		serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_slice(body))
			.map_err(|source| DecodeError::Profile { source })?;

	check_shape(&value)?;

	let envelope: ProfileEnvelope = serde_path_to_error::deserialize(&value)
		.map_err(|source| DecodeError::Profile { source })?;
	let profile = envelope.profile.unwrap_or_default();
	let nickname = profile.nickname.unwrap_or_default();

	user.raw_data = match value {
		Value::Object(mut top) => match top.remove("profile") {
			Some(Value::Object(raw)) => raw,
			_ => Map::new(),
		},
		_ => Map::new(),
	};
	user.email = String::new();
	user.name = nickname.clone();
	user.nick_name = nickname;
	user.user_id = profile.guid.unwrap_or_default();
	user.location = profile.location.unwrap_or_default();
	user.avatar_url = profile.image.unwrap_or_default().image_url.unwrap_or_default();

	Ok(())
}

// Struct visitors also accept sequences, so containers are checked before typed decoding.
fn check_shape(value: &Value) -> Result<(), DecodeError> {
	let Value::Object(top) = value else {
		return Err(DecodeError::UnexpectedShape { path: "." });
	};
	let Some(profile) = optional_object(top.get("profile"), "profile")? else {
		return Ok(());
	};

	optional_object(profile.get("image"), "profile.image")?;

	Ok(())
}

fn optional_object<'a>(
	value: Option<&'a Value>,
	path: &'static str,
) -> Result<Option<&'a Map<String, Value>>, DecodeError> {
	match value {
		None | Some(Value::Null) => Ok(None),
		Some(Value::Object(map)) => Ok(Some(map)),
		Some(_) => Err(DecodeError::UnexpectedShape { path }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn maps_full_profile() {
		let mut user = User::new("yahoo");
		let body = br#"{"profile":{"nickname":"jdoe","location":"US","guid":"123","image":{"imageURL":"http://x/img.png"}}}"#;

		apply_profile(&mut user, body).expect("Profile fixture should decode.");

		assert_eq!(user.name, "jdoe");
		assert_eq!(user.nick_name, "jdoe");
		assert_eq!(user.user_id, "123");
		assert_eq!(user.location, "US");
		assert_eq!(user.avatar_url, "http://x/img.png");
		assert_eq!(user.email, "");
		assert_eq!(user.raw_data.get("guid"), Some(&Value::from("123")));
	}

	#[test]
	fn partial_and_empty_objects_decode_to_empty_strings() {
		let mut user = User::new("yahoo");

		apply_profile(&mut user, br#"{"profile":{"nickname":"jdoe"}}"#)
			.expect("Missing image should not fail.");

		assert_eq!(user.avatar_url, "");
		assert_eq!(user.user_id, "");

		let mut user = User::new("yahoo");

		apply_profile(&mut user, b"{}").expect("Empty object should not fail.");

		assert_eq!(user.name, "");
		assert!(user.raw_data.is_empty());

		let mut user = User::new("yahoo");

		apply_profile(&mut user, br#"{"profile":{"nickname":null,"image":null}}"#)
			.expect("Null fields should not fail.");

		assert_eq!(user.nick_name, "");
	}

	#[test]
	fn malformed_json_reports_decode_error() {
		let mut user = User::new("yahoo");
		let err = apply_profile(&mut user, b"{not json").expect_err("Malformed JSON must fail.");

		assert!(matches!(err, DecodeError::Profile { .. }));
		assert!(apply_profile(&mut user, b"").is_err());

		let err = apply_profile(&mut user, br#"{"profile":{"guid":42}}"#)
			.expect_err("Wrong field type must fail.");

		assert!(err.to_string().contains("profile.guid"));
		assert_eq!(user.user_id, "");
	}

	#[test]
	fn non_object_containers_are_rejected() {
		let mut user = User::new("yahoo");

		for (body, path) in [
			("[null]", "."),
			("null", "."),
			(r#"{"profile":[{"guid":"123"}]}"#, "profile"),
			(r#"{"profile":{"guid":"123","image":["http://x/img.png"]}}"#, "profile.image"),
		] {
			let err = apply_profile(&mut user, body.as_bytes())
				.expect_err("Non-object container must fail.");

			assert!(
				matches!(err, DecodeError::UnexpectedShape { path: actual } if actual == path),
				"unexpected error for {body}: {err:?}"
			);
		}

		assert_eq!(user.user_id, "");
		assert!(user.raw_data.is_empty());
	}

	#[test]
	fn debug_redacts_tokens() {
		let user = User { access_token: "access-secret".into(), ..User::new("yahoo") };

		assert!(!format!("{user:?}").contains("access-secret"));
	}
}
