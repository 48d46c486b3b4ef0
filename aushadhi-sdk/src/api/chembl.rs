pub use aushadhi_types::api::chembl::{ENDPOINT, Request, Response};

use crate::{
	Error,
	api::ApiResponse,
	auth::http::AuthorizedClient,
	diagnostics::DiagnosticSink,
	forward::{OperationRequest, RequestForwarder},
};

pub(crate) const OPERATION: &str = "find_hits";

pub(crate) async fn post<C, S>(
	forwarder: &RequestForwarder<C, S>,
	request: &Request<'_>,
) -> Result<ApiResponse<Response>, Error>
where
	C: AuthorizedClient,
	S: DiagnosticSink,
{
	forwarder
		.forward(OperationRequest::new(OPERATION, ENDPOINT, request))
		.await
}
