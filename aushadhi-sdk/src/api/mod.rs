use http::{HeaderMap, StatusCode};

pub(crate) mod chembl;
pub(crate) mod evaluation;
pub(crate) mod health;
pub(crate) mod info;
pub(crate) mod molecules;
pub(crate) mod protein;

/// The backend's answer, exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub data: T,
}

impl<T> ApiResponse<T> {
	pub fn new(status: StatusCode, data: T) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			data,
		}
	}

	pub fn into_data(self) -> T {
		self.data
	}
}
