use serde::{Deserialize, Serialize};

pub const ENDPOINT: &str = "/";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Response {
	pub message: String,
}
