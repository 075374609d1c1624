// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowOutcome},
};

#[cfg(feature = "metrics")]
const FLOW_COUNTER: &str = "oauth2_yahoo_flow_total";

/// Counts entry into a provider operation.
pub fn record_flow_attempt(kind: FlowKind) {
	increment(kind, FlowOutcome::Attempt, None);
}

/// Counts the terminal outcome of a provider operation, labeling failures by their kind.
pub fn record_flow_result(kind: FlowKind, failure: Option<&Error>) {
	match failure {
		Some(error) => increment(kind, FlowOutcome::Failure, Some(error.kind().as_str())),
		None => increment(kind, FlowOutcome::Success, None),
	}
}

fn increment(kind: FlowKind, outcome: FlowOutcome, error_kind: Option<&'static str>) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			FLOW_COUNTER,
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str(),
			"error_kind" => error_kind.unwrap_or("none")
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome, error_kind);
	}
}
