use std::{
	borrow::Cow,
	fmt::Debug,
	pin::Pin,
	task::{Context, Poll},
	time::Instant,
};

use log::LevelFilter;
use tower::Service;

use crate::Error;

/// Outermost transport layer. Times each call and tags failures with the
/// route they came from.
#[derive(Clone)]
pub(crate) struct LogLayer {
	level_filter: LevelFilter,
	method: &'static str,
	endpoint: Cow<'static, str>,
}

impl LogLayer {
	pub fn new(
		level_filter: LevelFilter,
		method: &'static str,
		endpoint: impl Into<Cow<'static, str>>,
	) -> Self {
		Self {
			level_filter,
			method,
			endpoint: endpoint.into(),
		}
	}
}

impl<S> tower::Layer<S> for LogLayer {
	type Service = LogService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		LogService {
			inner,
			layer: self.clone(),
		}
	}
}

#[derive(Clone)]
pub(crate) struct LogService<S> {
	inner: S,
	layer: LogLayer,
}

impl<S, Req> Service<Req> for LogService<S>
where
	S: Service<Req, Error = Error>,
	S::Response: Debug,
	Req: Debug,
{
	type Response = S::Response;
	type Error = S::Error;
	type Future = LoggedFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner
			.poll_ready(cx)
			.map_err(|e| e.with_context(self.layer.endpoint.clone()))
	}

	fn call(&mut self, req: Req) -> Self::Future {
		if self.layer.level_filter >= LevelFilter::Trace {
			log::trace!("{} {}: {:?}", self.layer.method, self.layer.endpoint, req);
		}
		LoggedFuture {
			inner: self.inner.call(req),
			layer: self.layer.clone(),
			started: Instant::now(),
		}
	}
}

#[pin_project::pin_project]
pub(crate) struct LoggedFuture<F> {
	#[pin]
	inner: F,
	layer: LogLayer,
	started: Instant,
}

impl<F, Res> Future for LoggedFuture<F>
where
	F: Future<Output = Result<Res, Error>>,
	Res: Debug,
{
	type Output = F::Output;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.project();
		let result = match this.inner.poll(cx) {
			Poll::Ready(result) => result,
			Poll::Pending => return Poll::Pending,
		};
		let LogLayer {
			level_filter,
			method,
			endpoint,
		} = &*this.layer;
		let elapsed = this.started.elapsed();

		Poll::Ready(match result {
			Ok(res) => {
				if *level_filter >= LevelFilter::Debug {
					log::debug!("{method} {endpoint} completed in {elapsed:?}");
				}
				if *level_filter >= LevelFilter::Trace {
					log::trace!("{method} {endpoint} response: {res:?}");
				}
				Ok(res)
			}
			Err(e) => {
				let e = e.with_context(endpoint.clone());
				if *level_filter >= LevelFilter::Error {
					log::error!("{method} {endpoint} failed after {elapsed:?}: {e}");
				}
				Err(e)
			}
		})
	}
}
