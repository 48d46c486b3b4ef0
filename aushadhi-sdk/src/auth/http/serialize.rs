use std::task::{Context, Poll};

use tower::Service;

use crate::{Error, ErrorKind};

use super::{Request, RequestMethod};

#[derive(Clone)]
pub(crate) struct SerializeLayer<'a, T> {
	data: &'a T,
}

impl<'a, T> SerializeLayer<'a, T> {
	pub(crate) fn new(data: &'a T) -> Self {
		Self { data }
	}
}

impl<'a, S, T> tower::Layer<S> for SerializeLayer<'a, T> {
	type Service = SerializeService<'a, S, T>;

	fn layer(&self, inner: S) -> Self::Service {
		SerializeService {
			inner,
			data: self.data,
		}
	}
}

#[derive(Clone)]
pub(crate) struct SerializeService<'a, S, T> {
	inner: S,
	data: &'a T,
}

impl<S, Req, Url> Service<Request<(), Url>> for SerializeService<'_, S, Req>
where
	S: Service<Request<bytes::Bytes, Url>, Error = Error>,
	Req: serde::Serialize,
{
	type Response = S::Response;
	type Error = S::Error;
	type Future = SerializeFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<(), Url>) -> Self::Future {
		match serde_json::to_vec(self.data) {
			Ok(body) => {
				let req_with_body = Request {
					method: RequestMethod::Post(bytes::Bytes::from_owner(body)),
					url: req.url,
					client: req.client,
				};
				SerializeFuture::Inner(self.inner.call(req_with_body))
			}
			Err(e) => SerializeFuture::Error(Some(Error::custom_with_source(
				ErrorKind::RequestConstruction,
				e,
				Some("serializing request body"),
			))),
		}
	}
}

#[pin_project::pin_project(project = SerializeFutureProj)]
pub(crate) enum SerializeFuture<F> {
	Inner(#[pin] F),
	Error(Option<Error>),
}

impl<F, Resp> std::future::Future for SerializeFuture<F>
where
	F: std::future::Future<Output = Result<Resp, Error>>,
{
	type Output = F::Output;

	fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.project();
		match this {
			SerializeFutureProj::Inner(fut) => fut.poll(cx),
			SerializeFutureProj::Error(err_opt) => {
				Poll::Ready(Err(err_opt.take().expect("polled after ready")))
			}
		}
	}
}
