use std::{borrow::Cow, fmt::Debug, time::Instant};

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
	Error,
	api::ApiResponse,
	auth::http::AuthorizedClient,
	diagnostics::{BodyShape, Diagnostic, DiagnosticSink, LogSink},
};

/// One named call against a fixed route.
#[derive(Debug, Clone, Copy)]
pub struct OperationRequest<'a, Req> {
	pub operation: &'static str,
	pub endpoint: &'static str,
	pub payload: &'a Req,
}

impl<'a, Req> OperationRequest<'a, Req> {
	pub fn new(operation: &'static str, endpoint: &'static str, payload: &'a Req) -> Self {
		Self {
			operation,
			endpoint,
			payload,
		}
	}
}

/// Sends each request through the injected client exactly once and hands
/// back whatever the client produced, reporting the call to the sink on the
/// way. Failures are classified for diagnostics only; the caller receives the
/// client's error untouched.
#[derive(Debug)]
pub struct RequestForwarder<C, S = LogSink> {
	client: C,
	sink: S,
}

impl<C, S> RequestForwarder<C, S> {
	pub fn new(client: C, sink: S) -> Self {
		Self { client, sink }
	}

	pub fn client(&self) -> &C {
		&self.client
	}

	pub fn sink(&self) -> &S {
		&self.sink
	}
}

impl<C, S> RequestForwarder<C, S>
where
	C: AuthorizedClient,
	S: DiagnosticSink,
{
	pub async fn forward<Req, Res>(
		&self,
		request: OperationRequest<'_, Req>,
	) -> Result<ApiResponse<Res>, Error>
	where
		Req: Serialize + Debug,
		Res: DeserializeOwned + Serialize + Debug,
	{
		debug_assert!(!request.operation.is_empty(), "operation label is empty");
		self.sink.info(&Diagnostic::Sending {
			operation: request.operation,
			endpoint: request.endpoint,
			at: Utc::now(),
			payload: request.payload,
		});

		let started = Instant::now();
		let result = self
			.client
			.post_auth(Cow::Borrowed(request.endpoint), request.payload)
			.await;
		self.report(request.operation, request.endpoint, started, &result);
		result
	}

	/// Same contract as [`Self::forward`] for the body-less GET routes.
	pub async fn forward_get<Res>(
		&self,
		operation: &'static str,
		endpoint: &'static str,
	) -> Result<ApiResponse<Res>, Error>
	where
		Res: DeserializeOwned + Serialize + Debug,
	{
		debug_assert!(!operation.is_empty(), "operation label is empty");
		self.sink.info(&Diagnostic::Sending {
			operation,
			endpoint,
			at: Utc::now(),
			payload: &(),
		});

		let started = Instant::now();
		let result = self.client.get_auth(Cow::Borrowed(endpoint)).await;
		self.report(operation, endpoint, started, &result);
		result
	}

	fn report<Res>(
		&self,
		operation: &str,
		endpoint: &str,
		started: Instant,
		result: &Result<ApiResponse<Res>, Error>,
	) where
		Res: Serialize,
	{
		let elapsed = started.elapsed();
		match result {
			Ok(response) => {
				if !self.sink.enabled() {
					return;
				}
				self.sink.info(&Diagnostic::Resolved {
					operation,
					endpoint,
					at: Utc::now(),
					status: response.status,
					elapsed,
					body: BodyShape::of(&response.data),
				});
			}
			Err(e) => self.sink.error(&Diagnostic::Rejected {
				operation,
				endpoint,
				at: Utc::now(),
				elapsed,
				failure: e.failure(),
				error: e,
			}),
		}
	}
}
