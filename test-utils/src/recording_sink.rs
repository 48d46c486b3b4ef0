use std::sync::Mutex;

use aushadhi_sdk::{
	Failure,
	diagnostics::{BodyShape, Diagnostic, DiagnosticSink},
};
use http::StatusCode;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
	Sending {
		operation: String,
		endpoint: String,
		payload: String,
	},
	Resolved {
		operation: String,
		status: StatusCode,
		body: BodyShape,
	},
	Rejected {
		operation: String,
		failure: Failure,
		rendered: String,
	},
}

/// Keeps every diagnostic it receives, and also forwards it to `log`.
#[derive(Default)]
pub struct RecordingSink {
	events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn events(&self) -> Vec<RecordedEvent> {
		self.events.lock().unwrap().clone()
	}

	fn record(&self, event: &Diagnostic<'_>) {
		let recorded = match event {
			Diagnostic::Sending {
				operation,
				endpoint,
				payload,
				..
			} => RecordedEvent::Sending {
				operation: operation.to_string(),
				endpoint: endpoint.to_string(),
				payload: format!("{payload:?}"),
			},
			Diagnostic::Resolved {
				operation,
				status,
				body,
				..
			} => RecordedEvent::Resolved {
				operation: operation.to_string(),
				status: *status,
				body: body.clone(),
			},
			Diagnostic::Rejected {
				operation, failure, ..
			} => RecordedEvent::Rejected {
				operation: operation.to_string(),
				failure: *failure,
				rendered: event.to_string(),
			},
		};
		self.events.lock().unwrap().push(recorded);
	}
}

impl DiagnosticSink for RecordingSink {
	fn info(&self, event: &Diagnostic<'_>) {
		log::info!("{event}");
		self.record(event);
	}

	fn error(&self, event: &Diagnostic<'_>) {
		log::error!("{event}");
		self.record(event);
	}
}
