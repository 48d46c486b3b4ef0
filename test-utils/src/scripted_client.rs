use std::{borrow::Cow, collections::VecDeque, fmt::Debug, sync::Mutex};

use aushadhi_sdk::{Error, api::ApiResponse, auth::http::AuthorizedClient};
use serde::{Serialize, de::DeserializeOwned};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
	pub method: http::Method,
	pub endpoint: String,
	pub body: Option<serde_json::Value>,
}

/// Error source carrying a token, used to prove an error reached the caller
/// as the very value the client produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMarker(pub u64);

impl std::fmt::Display for SourceMarker {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "marker {}", self.0)
	}
}

impl std::error::Error for SourceMarker {}

/// An [`AuthorizedClient`] that answers from a script and records every call.
#[derive(Default)]
pub struct ScriptedClient {
	outcomes: Mutex<VecDeque<Result<ApiResponse<serde_json::Value>, Error>>>,
	calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn respond_with(self, response: ApiResponse<serde_json::Value>) -> Self {
		self.push(Ok(response));
		self
	}

	pub fn fail_with(self, error: Error) -> Self {
		self.push(Err(error));
		self
	}

	pub fn push(&self, outcome: Result<ApiResponse<serde_json::Value>, Error>) {
		self.outcomes.lock().unwrap().push_back(outcome);
	}

	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().unwrap().clone()
	}

	fn next_outcome<Res>(&self) -> Result<ApiResponse<Res>, Error>
	where
		Res: DeserializeOwned,
	{
		let outcome = self
			.outcomes
			.lock()
			.unwrap()
			.pop_front()
			.expect("ScriptedClient ran out of scripted outcomes");
		let response = outcome?;
		let data = serde_json::from_value(response.data)?;
		Ok(ApiResponse {
			status: response.status,
			headers: response.headers,
			data,
		})
	}
}

impl AuthorizedClient for ScriptedClient {
	async fn get_auth<Res>(&self, endpoint: Cow<'static, str>) -> Result<ApiResponse<Res>, Error>
	where
		Res: DeserializeOwned + Debug,
	{
		self.calls.lock().unwrap().push(RecordedCall {
			method: http::Method::GET,
			endpoint: endpoint.into_owned(),
			body: None,
		});
		self.next_outcome()
	}

	async fn post_auth<Req, Res>(
		&self,
		endpoint: Cow<'static, str>,
		body: &Req,
	) -> Result<ApiResponse<Res>, Error>
	where
		Res: DeserializeOwned + Debug,
		Req: Serialize + Debug,
	{
		self.calls.lock().unwrap().push(RecordedCall {
			method: http::Method::POST,
			endpoint: endpoint.into_owned(),
			body: Some(serde_json::to_value(body).expect("request body serializes")),
		});
		self.next_outcome()
	}
}
