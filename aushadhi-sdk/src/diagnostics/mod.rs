//! Observational events emitted around every forwarded call.
//!
//! Sinks only ever see borrowed views of the call; nothing they do can change
//! what the caller gets back.

use std::{fmt::Debug, fmt::Display, sync::Arc, time::Duration};

use chrono::{DateTime, SecondsFormat, Utc};
use http::StatusCode;

use crate::{Error, Failure};

mod shape;

pub use shape::{BodyShape, ElementShape, FieldShape, ValueKind};

pub enum Diagnostic<'a> {
	Sending {
		operation: &'a str,
		endpoint: &'a str,
		at: DateTime<Utc>,
		payload: &'a dyn Debug,
	},
	Resolved {
		operation: &'a str,
		endpoint: &'a str,
		at: DateTime<Utc>,
		status: StatusCode,
		elapsed: Duration,
		body: BodyShape,
	},
	Rejected {
		operation: &'a str,
		endpoint: &'a str,
		at: DateTime<Utc>,
		elapsed: Duration,
		failure: Failure,
		error: &'a Error,
	},
}

impl Diagnostic<'_> {
	pub fn operation(&self) -> &str {
		match self {
			Diagnostic::Sending { operation, .. }
			| Diagnostic::Resolved { operation, .. }
			| Diagnostic::Rejected { operation, .. } => operation,
		}
	}
}

impl Display for Diagnostic<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Diagnostic::Sending {
				operation,
				endpoint,
				at,
				payload,
			} => write!(
				f,
				"[{operation}] sending {endpoint} at {} body={payload:?}",
				at.to_rfc3339_opts(SecondsFormat::Millis, true)
			),
			Diagnostic::Resolved {
				operation,
				endpoint,
				at,
				status,
				elapsed,
				body,
			} => write!(
				f,
				"[{operation}] {endpoint} resolved at {} status={status} duration={:.2}ms body={body}",
				at.to_rfc3339_opts(SecondsFormat::Millis, true),
				elapsed.as_secs_f64() * 1000.0
			),
			Diagnostic::Rejected {
				operation,
				endpoint,
				at,
				elapsed,
				failure,
				error,
			} => write!(
				f,
				"[{operation}] {endpoint} rejected at {} after {:.2}ms failure={failure} error={error}",
				at.to_rfc3339_opts(SecondsFormat::Millis, true),
				elapsed.as_secs_f64() * 1000.0
			),
		}
	}
}

/// Receiver for forwarding diagnostics.
pub trait DiagnosticSink: Send + Sync {
	/// Lets the forwarder skip building a [`BodyShape`] nobody will read.
	fn enabled(&self) -> bool {
		true
	}

	fn info(&self, event: &Diagnostic<'_>);

	fn error(&self, event: &Diagnostic<'_>);
}

impl<T> DiagnosticSink for Arc<T>
where
	T: DiagnosticSink + ?Sized,
{
	fn enabled(&self) -> bool {
		T::enabled(self)
	}

	fn info(&self, event: &Diagnostic<'_>) {
		T::info(self, event)
	}

	fn error(&self, event: &Diagnostic<'_>) {
		T::error(self, event)
	}
}

/// Writes diagnostics through the `log` facade.
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
	level_filter: log::LevelFilter,
}

impl LogSink {
	pub fn new(level_filter: log::LevelFilter) -> Self {
		Self { level_filter }
	}
}

impl Default for LogSink {
	fn default() -> Self {
		Self::new(log::LevelFilter::Debug)
	}
}

impl DiagnosticSink for LogSink {
	fn enabled(&self) -> bool {
		self.level_filter >= log::LevelFilter::Info && log::log_enabled!(log::Level::Info)
	}

	fn info(&self, event: &Diagnostic<'_>) {
		if self.level_filter >= log::LevelFilter::Info {
			log::info!("{event}");
		}
	}

	fn error(&self, event: &Diagnostic<'_>) {
		if self.level_filter >= log::LevelFilter::Error {
			log::error!("{event}");
		}
	}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
	fn enabled(&self) -> bool {
		false
	}

	fn info(&self, _event: &Diagnostic<'_>) {}

	fn error(&self, _event: &Diagnostic<'_>) {}
}

