use std::{
	marker::PhantomData,
	task::{Context, Poll},
};

use aushadhi_types::error::ResponseError;
use serde::de::DeserializeOwned;
use tower::Service;

use crate::{Error, ErrorKind, api::ApiResponse};

use super::download_body::RawResponse;

pub(crate) struct DeserializeLayer<Res> {
	_phantom: PhantomData<Res>,
}

impl<Res> Clone for DeserializeLayer<Res> {
	fn clone(&self) -> Self {
		Self {
			_phantom: PhantomData,
		}
	}
}

impl<Res> DeserializeLayer<Res> {
	pub(crate) fn new() -> Self {
		Self {
			_phantom: PhantomData,
		}
	}
}

impl<S, Res> tower::Layer<S> for DeserializeLayer<Res> {
	type Service = DeserializeService<S, Res>;

	fn layer(&self, inner: S) -> Self::Service {
		DeserializeService {
			inner,
			_phantom: PhantomData,
		}
	}
}

pub(crate) struct DeserializeService<S, Res> {
	inner: S,
	_phantom: PhantomData<Res>,
}

impl<S, Res> Clone for DeserializeService<S, Res>
where
	S: Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
			_phantom: PhantomData,
		}
	}
}

impl<S, Res, Req> Service<Req> for DeserializeService<S, Res>
where
	S: Service<Req, Response = RawResponse, Error = Error>,
	Res: DeserializeOwned,
{
	type Response = ApiResponse<Res>;
	type Error = Error;
	type Future = DeserializeFuture<S::Future, Res>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Req) -> Self::Future {
		DeserializeFuture {
			fut: self.inner.call(req),
			_phantom: PhantomData,
		}
	}
}

#[pin_project::pin_project]
pub(crate) struct DeserializeFuture<F, Res> {
	#[pin]
	fut: F,
	_phantom: PhantomData<Res>,
}

impl<F, Res> Future for DeserializeFuture<F, Res>
where
	F: Future<Output = Result<RawResponse, Error>>,
	Res: DeserializeOwned,
{
	type Output = Result<ApiResponse<Res>, Error>;

	fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match self.project().fut.poll(cx) {
			Poll::Ready(Ok(raw)) => Poll::Ready(into_api_response(raw)),
			Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
			Poll::Pending => Poll::Pending,
		}
	}
}

pub(crate) fn into_api_response<Res>(raw: RawResponse) -> Result<ApiResponse<Res>, Error>
where
	Res: DeserializeOwned,
{
	if !raw.status.is_success() {
		return Err(ResponseError::Rejected {
			status: raw.status.as_u16(),
			body: String::from_utf8_lossy(&raw.body).into_owned(),
		}
		.into());
	}
	match serde_json::from_slice(&raw.body) {
		Ok(data) => Ok(ApiResponse {
			status: raw.status,
			headers: raw.headers,
			data,
		}),
		Err(e) => Err(Error::custom_with_source(
			ErrorKind::Response,
			e,
			Some(format!(
				"Failed to deserialize json response: {}",
				String::from_utf8_lossy(&raw.body)
			)),
		)
		.with_status(raw.status)),
	}
}
