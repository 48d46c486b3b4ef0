use serde::{Deserialize, Serialize};

pub const ENDPOINT: &str = "/health";

const HEALTHY_STR: &str = "healthy";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Response {
	pub status: String,
}

impl Response {
	pub fn is_healthy(&self) -> bool {
		self.status == HEALTHY_STR
	}
}
