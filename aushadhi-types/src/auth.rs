use std::{
	borrow::Cow,
	fmt::{Debug, Display},
};

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct APIKey<'a>(pub Cow<'a, str>);

impl APIKey<'_> {
	pub fn into_owned(self) -> APIKey<'static> {
		APIKey(Cow::Owned(self.0.into_owned()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl<'a> From<&'a str> for APIKey<'a> {
	fn from(value: &'a str) -> Self {
		Self(Cow::Borrowed(value))
	}
}

impl From<String> for APIKey<'static> {
	fn from(value: String) -> Self {
		Self(Cow::Owned(value))
	}
}

impl Display for APIKey<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

// keys end up in logged client configs, never print them
impl Debug for APIKey<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("APIKey").field(&"<redacted>").finish()
	}
}
