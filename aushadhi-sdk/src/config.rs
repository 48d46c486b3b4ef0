use std::borrow::Cow;

use aushadhi_types::auth::APIKey;

use crate::consts::{DEFAULT_API_URL, USER_AGENT};

#[derive(Debug, Clone)]
pub struct ClientConfig {
	pub(crate) base_url: String,
	pub(crate) api_key: Option<APIKey<'static>>,
	pub(crate) log_level: log::LevelFilter,
	pub(crate) user_agent: Cow<'static, str>,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_API_URL.to_string(),
			api_key: None,
			log_level: log::LevelFilter::Debug,
			user_agent: Cow::Borrowed(USER_AGENT),
		}
	}
}

impl ClientConfig {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			..Default::default()
		}
	}

	pub fn with_api_key(mut self, api_key: impl Into<APIKey<'static>>) -> Self {
		self.api_key = Some(api_key.into());
		self
	}

	pub fn with_log_level(mut self, log_level: log::LevelFilter) -> Self {
		self.log_level = log_level;
		self
	}

	pub fn with_user_agent(mut self, user_agent: impl Into<Cow<'static, str>>) -> Self {
		self.user_agent = user_agent.into();
		self
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn log_level(&self) -> log::LevelFilter {
		self.log_level
	}
}
