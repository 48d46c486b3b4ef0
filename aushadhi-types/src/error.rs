use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
	#[error("Failed to decode base64 molecule image: `{0}`")]
	Base64DecodeError(#[from] base64::DecodeError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResponseError {
	#[error("API Error, status: `{status}`, body: `{body}`")]
	Rejected { status: u16, body: String },
}

impl ResponseError {
	pub fn status(&self) -> u16 {
		match self {
			ResponseError::Rejected { status, .. } => *status,
		}
	}

	pub fn body(&self) -> &str {
		match self {
			ResponseError::Rejected { body, .. } => body,
		}
	}
}
