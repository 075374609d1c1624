//! Optional observability helpers for provider flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `oauth2_yahoo.flow` with `flow` and `stage`
//!   fields. Failed flows also carry `error_kind` and, when an upstream response was
//!   received, `http_status`.
//! - Enable `metrics` to increment the `oauth2_yahoo_flow_total` counter, labeled by `flow`,
//!   `outcome`, and `error_kind` (`none` unless the outcome is a failure).
//!
//! Neither feature logs failures; errors are always returned to the host as values.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Provider operations observed by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authorization URL construction.
	BeginAuth,
	/// Profile fetch and normalization.
	FetchUser,
	/// Authorization code exchange performed by a session.
	Exchange,
	/// Refresh token grant.
	Refresh,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::BeginAuth => "begin_auth",
			FlowKind::FetchUser => "fetch_user",
			FlowKind::Exchange => "exchange",
			FlowKind::Refresh => "refresh",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a provider operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Starts observing a flow: opens its span and counts the attempt.
pub fn start_flow(kind: FlowKind, stage: &'static str) -> FlowSpan {
	record_flow_attempt(kind);

	FlowSpan::new(kind, stage)
}

/// Closes a flow: tags `span` with the failure, if any, and counts the terminal outcome.
pub fn finish_flow(span: &FlowSpan, kind: FlowKind, failure: Option<&Error>) {
	if let Some(error) = failure {
		span.record_failure(error);
	}

	record_flow_result(kind, failure);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::TransportError;

	#[test]
	fn flow_lifecycle_accepts_success_and_failure() {
		let span = start_flow(FlowKind::FetchUser, "flow_lifecycle");

		finish_flow(&span, FlowKind::FetchUser, None);
		finish_flow(
			&span,
			FlowKind::FetchUser,
			Some(&Error::from(TransportError::Status { status: 502 })),
		);
	}

	#[test]
	fn labels_are_stable() {
		assert_eq!(FlowKind::BeginAuth.to_string(), "begin_auth");
		assert_eq!(FlowOutcome::Failure.to_string(), "failure");
	}
}
