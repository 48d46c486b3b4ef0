pub use aushadhi_types::api::info::{ENDPOINT, Response};

use crate::{
	Error, api::ApiResponse, auth::http::AuthorizedClient, diagnostics::DiagnosticSink,
	forward::RequestForwarder,
};

pub(crate) const OPERATION: &str = "service_info";

pub(crate) async fn get<C, S>(forwarder: &RequestForwarder<C, S>) -> Result<ApiResponse<Response>, Error>
where
	C: AuthorizedClient,
	S: DiagnosticSink,
{
	forwarder.forward_get(OPERATION, ENDPOINT).await
}
