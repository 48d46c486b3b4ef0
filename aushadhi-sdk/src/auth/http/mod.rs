use std::{borrow::Cow, fmt::Debug, sync::Arc};

use aushadhi_types::auth::APIKey;
use bytes::Bytes;
use reqwest::{IntoUrl, RequestBuilder, header::HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tower::{ServiceBuilder, ServiceExt};

use crate::{Error, ErrorKind, api::ApiResponse, config::ClientConfig, consts::api_url};

mod auth;
mod deserialize;
mod download_body;
mod logging;
mod serialize;

/// reqwest backed [`AuthorizedClient`], configured once with a base URL and
/// an optional bearer key and then shared by every operation.
pub struct AuthClient {
	reqwest_client: reqwest::Client,
	base_url: reqwest::Url,
	api_key: Option<APIKey<'static>>,
	authorization: Option<HeaderValue>,
	log_level: log::LevelFilter,
}

impl AuthClient {
	pub fn new(config: ClientConfig) -> Result<Self, Error> {
		let reqwest_client = reqwest::Client::builder()
			.user_agent(config.user_agent.as_ref())
			.gzip(true)
			.build()
			.map_err(|e| {
				Error::custom_with_source(ErrorKind::Config, e, Some("building http client"))
			})?;
		Self::from_reqwest(reqwest_client, config)
	}

	/// Reuses an existing reqwest client, and with it its connection pool.
	pub fn from_reqwest(reqwest_client: reqwest::Client, config: ClientConfig) -> Result<Self, Error> {
		Ok(Self {
			reqwest_client,
			base_url: parse_base_url(&config.base_url)?,
			authorization: config.api_key.as_ref().map(auth::bearer_header).transpose()?,
			api_key: config.api_key,
			log_level: config.log_level,
		})
	}

	pub fn base_url(&self) -> &str {
		self.base_url.as_str()
	}

	pub fn is_authenticated(&self) -> bool {
		self.api_key.is_some()
	}
}

fn parse_base_url(base_url: &str) -> Result<reqwest::Url, Error> {
	let url = reqwest::Url::parse(base_url).map_err(|e| {
		Error::custom_with_source(
			ErrorKind::Config,
			e,
			Some(format!("parsing base URL '{base_url}'")),
		)
	})?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(Error::custom(
			ErrorKind::Config,
			format!(
				"unsupported scheme '{}' in base URL '{base_url}'",
				url.scheme()
			),
		));
	}
	Ok(url)
}

impl Debug for AuthClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let api_key = self
			.api_key
			.as_ref()
			.map(|k| blake3::hash(k.as_str().as_bytes()).to_hex());
		f.debug_struct("AuthClient")
			.field("base_url", &self.base_url.as_str())
			.field("api_key", &api_key)
			.finish()
	}
}

impl AuthClient {
	async fn inner_post<Req, Res>(
		&self,
		request: Request<(), reqwest::Url>,
		endpoint: Cow<'static, str>,
		body: &Req,
	) -> Result<ApiResponse<Res>, Error>
	where
		Res: DeserializeOwned + Debug,
		Req: Serialize + Debug,
	{
		ServiceBuilder::new()
			.layer(logging::LogLayer::new(self.log_level, "POST", endpoint))
			.layer(serialize::SerializeLayer::<Req>::new(body))
			.layer(deserialize::DeserializeLayer::<Res>::new())
			.layer(download_body::DownloadLayer::new())
			.map_request(|r: Request<Bytes, reqwest::Url>| -> RequestBuilder {
				r.into_builder_map_body(|b| b)
			})
			.option_layer(self.authorization.as_ref().map(auth::AuthLayer::new)) // only when a key is configured
			.service_fn(execute_request)
			.oneshot(request)
			.await
	}

	async fn inner_get<Res>(
		&self,
		request: Request<(), reqwest::Url>,
		endpoint: Cow<'static, str>,
	) -> Result<ApiResponse<Res>, Error>
	where
		Res: DeserializeOwned + Debug,
	{
		ServiceBuilder::new()
			.layer(logging::LogLayer::new(self.log_level, "GET", endpoint))
			.layer(deserialize::DeserializeLayer::<Res>::new())
			.layer(download_body::DownloadLayer::new())
			.map_request(|request: Request<(), reqwest::Url>| {
				request.into_builder_map_body(|()| Bytes::new())
			})
			.option_layer(self.authorization.as_ref().map(auth::AuthLayer::new)) // only when a key is configured
			.service_fn(execute_request)
			.oneshot(request)
			.await
	}
}

/// The one capability operations need from a transport: authenticated JSON
/// calls against fixed routes, answered with the backend's response as is.
#[allow(async_fn_in_trait)]
pub trait AuthorizedClient: Send + Sync {
	async fn get_auth<Res>(&self, endpoint: Cow<'static, str>) -> Result<ApiResponse<Res>, Error>
	where
		Res: DeserializeOwned + Debug;

	async fn post_auth<Req, Res>(
		&self,
		endpoint: Cow<'static, str>,
		body: &Req,
	) -> Result<ApiResponse<Res>, Error>
	where
		Res: DeserializeOwned + Debug,
		Req: Serialize + Debug;
}

impl AuthorizedClient for AuthClient {
	async fn get_auth<Res>(&self, endpoint: Cow<'static, str>) -> Result<ApiResponse<Res>, Error>
	where
		Res: DeserializeOwned + Debug,
	{
		self.inner_get(
			Request {
				method: RequestMethod::Get,
				url: api_url(&self.base_url, &endpoint),
				client: self.reqwest_client.clone(),
			},
			endpoint,
		)
		.await
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
		self.inner_post(
			Request {
				method: RequestMethod::Post(()),
				url: api_url(&self.base_url, &endpoint),
				client: self.reqwest_client.clone(),
			},
			endpoint,
			body,
		)
		.await
	}
}

impl<T> AuthorizedClient for Arc<T>
where
	T: AuthorizedClient,
{
	async fn get_auth<Res>(&self, endpoint: Cow<'static, str>) -> Result<ApiResponse<Res>, Error>
	where
		Res: DeserializeOwned + Debug,
	{
		T::get_auth(self, endpoint).await
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
		T::post_auth(self, endpoint, body).await
	}
}

async fn execute_request(request: RequestBuilder) -> Result<reqwest::Response, Error> {
	let (client, request) = request.build_split();
	let request = request?;
	Ok(client.execute(request).await?)
}

#[derive(Clone, Debug)]
pub(crate) enum RequestMethod<Body> {
	Get,
	Post(Body),
}

#[derive(Clone, Debug)]
pub(crate) struct Request<Body, Url> {
	pub(crate) method: RequestMethod<Body>,
	pub(crate) url: Url,
	pub(crate) client: reqwest::Client,
}

impl<Body> Request<Body, reqwest::Url> {
	fn into_builder_map_body<B>(self, map_body: impl FnOnce(Body) -> B) -> RequestBuilder
	where
		B: Into<reqwest::Body>,
	{
		match self.method {
			RequestMethod::Get => self.client.get(self.url),
			RequestMethod::Post(body) => post_request(self.client, self.url, map_body(body)),
		}
	}
}

fn post_request(
	client: reqwest::Client,
	url: impl IntoUrl,
	body: impl Into<reqwest::Body>,
) -> reqwest::RequestBuilder {
	client.post(url).body(body).header(
		reqwest::header::CONTENT_TYPE,
		HeaderValue::from_static("application/json"),
	)
}
