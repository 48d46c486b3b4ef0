use std::{
	pin::Pin,
	task::{Context, Poll},
};

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use http_body::Body;
use tower::{Layer, Service};

use crate::Error;

// Content-Length comes from the server, so it only seeds the buffer
const MAX_PREALLOCATION: u64 = 64 * 1024;

/// A response whose body has been read to the end.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
	pub(crate) status: StatusCode,
	pub(crate) headers: HeaderMap,
	pub(crate) body: Bytes,
}

#[derive(Clone, Default)]
pub(crate) struct DownloadLayer;

impl DownloadLayer {
	pub(crate) fn new() -> Self {
		Self
	}
}

impl<S> Layer<S> for DownloadLayer {
	type Service = DownloadService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		DownloadService { inner }
	}
}

#[derive(Clone, Default)]
pub(crate) struct DownloadService<S> {
	inner: S,
}

impl<S, Req> Service<Req> for DownloadService<S>
where
	S: Service<Req, Response = reqwest::Response, Error = Error>,
{
	type Response = RawResponse;
	type Error = Error;
	type Future = DownloadBodyFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Req) -> Self::Future {
		DownloadBodyFuture::AwaitingInner {
			fut: self.inner.call(req),
		}
	}
}

#[pin_project::pin_project(project = DownloadBodyFutureProj)]
pub(crate) enum DownloadBodyFuture<F> {
	AwaitingInner {
		#[pin]
		fut: F,
	},
	ReadingBody {
		status: StatusCode,
		headers: HeaderMap,
		#[pin]
		body: reqwest::Body,
		collected: BytesMut,
	},
	Done,
}

impl<F> Future for DownloadBodyFuture<F>
where
	F: Future<Output = Result<reqwest::Response, Error>>,
{
	type Output = Result<RawResponse, Error>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		loop {
			match self.as_mut().project() {
				DownloadBodyFutureProj::AwaitingInner { fut } => match fut.poll(cx) {
					Poll::Ready(Ok(response)) => {
						let (parts, body) = http::Response::from(response).into_parts();
						let hint = body.size_hint();
						let capacity = hint
							.exact()
							.unwrap_or(hint.lower())
							.min(MAX_PREALLOCATION);
						self.set(DownloadBodyFuture::ReadingBody {
							status: parts.status,
							headers: parts.headers,
							body,
							collected: BytesMut::with_capacity(capacity as usize),
						});
					}
					Poll::Ready(Err(e)) => {
						self.set(DownloadBodyFuture::Done);
						return Poll::Ready(Err(e));
					}
					Poll::Pending => return Poll::Pending,
				},
				DownloadBodyFutureProj::ReadingBody {
					status,
					headers,
					mut body,
					collected,
				} => match body.as_mut().poll_frame(cx) {
					Poll::Ready(Some(Ok(frame))) => {
						if let Some(chunk) = frame.data_ref() {
							collected.extend_from_slice(chunk);
						}
					}
					Poll::Ready(Some(Err(e))) => {
						// headers arrived but the body was cut off
						let err = Error::from(e).with_status(*status);
						self.set(DownloadBodyFuture::Done);
						return Poll::Ready(Err(err));
					}
					Poll::Ready(None) => {
						let response = RawResponse {
							status: *status,
							headers: std::mem::take(headers),
							body: std::mem::take(collected).freeze(),
						};
						self.set(DownloadBodyFuture::Done);
						return Poll::Ready(Ok(response));
					}
					Poll::Pending => return Poll::Pending,
				},
				DownloadBodyFutureProj::Done => panic!("DownloadBodyFuture polled after completion"),
			}
		}
	}
}
