use aushadhi_types::auth::APIKey;
use reqwest::{
	RequestBuilder,
	header::{AUTHORIZATION, HeaderValue},
};
use tower::{Layer, Service};

use crate::{Error, ErrorKind};

/// `Authorization` value for a key, built once per client and kept out of
/// `Debug` output.
pub(crate) fn bearer_header(api_key: &APIKey<'_>) -> Result<HeaderValue, Error> {
	let mut value = HeaderValue::try_from(format!("Bearer {}", api_key.as_str())).map_err(|e| {
		Error::custom_with_source(ErrorKind::Config, e, Some("API key is not a valid header value"))
	})?;
	value.set_sensitive(true);
	Ok(value)
}

#[derive(Clone, Debug)]
pub(crate) struct AuthLayer<'a> {
	authorization: &'a HeaderValue,
}

impl<'a> AuthLayer<'a> {
	pub fn new(authorization: &'a HeaderValue) -> Self {
		Self { authorization }
	}
}

impl<'a, S> Layer<S> for AuthLayer<'a> {
	type Service = AuthService<'a, S>;

	fn layer(&self, inner: S) -> Self::Service {
		AuthService {
			inner,
			authorization: self.authorization,
		}
	}
}

#[derive(Clone, Debug)]
pub(crate) struct AuthService<'a, S> {
	inner: S,
	authorization: &'a HeaderValue,
}

impl<S> Service<RequestBuilder> for AuthService<'_, S>
where
	S: Service<RequestBuilder>,
{
	type Response = S::Response;
	type Error = S::Error;
	type Future = S::Future;

	fn poll_ready(
		&mut self,
		cx: &mut std::task::Context<'_>,
	) -> std::task::Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: RequestBuilder) -> Self::Future {
		self.inner
			.call(req.header(AUTHORIZATION, self.authorization.clone()))
	}
}
