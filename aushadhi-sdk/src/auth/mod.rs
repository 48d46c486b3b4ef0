use self::http::{AuthClient, AuthorizedClient};

use crate::{
	Error,
	config::ClientConfig,
	diagnostics::{DiagnosticSink, LogSink},
	forward::RequestForwarder,
};

pub mod http;

/// Entry point of the SDK. Cheap to share behind an `Arc`; every call is
/// independent and only reads the client.
#[derive(Debug)]
pub struct Client<C = AuthClient, S = LogSink> {
	forwarder: RequestForwarder<C, S>,
}

impl Client {
	pub fn new(config: ClientConfig) -> Result<Self, Error> {
		let sink = LogSink::new(config.log_level);
		let client = AuthClient::new(config)?;
		Ok(Self::from_parts(client, sink))
	}
}

impl<C, S> Client<C, S>
where
	C: AuthorizedClient,
	S: DiagnosticSink,
{
	/// Builds a client around an already configured transport and sink.
	pub fn from_parts(client: C, sink: S) -> Self {
		Self {
			forwarder: RequestForwarder::new(client, sink),
		}
	}
}

impl<C, S> Client<C, S> {
	pub fn forwarder(&self) -> &RequestForwarder<C, S> {
		&self.forwarder
	}
}
