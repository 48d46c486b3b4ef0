use std::borrow::Cow;

use aushadhi_types::error::ResponseError;
use http::StatusCode;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
	/// The backend answered with a non-success status.
	#[error("server rejected request")]
	ServerRejected,
	/// The request went out but no complete response came back.
	#[error("no response")]
	NoResponse,
	/// The request could not be built or sent.
	#[error("request construction failed")]
	RequestConstruction,
	/// A success response whose body did not decode into the expected type.
	#[error("malformed response")]
	Response,
	#[error("invalid configuration")]
	Config,
}

/// Three-way classification of a failed forwarded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
	ServerRejected { status: Option<StatusCode> },
	NoResponse,
	RequestConstructionFailed,
}

impl std::fmt::Display for Failure {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Failure::ServerRejected {
				status: Some(status),
			} => write!(f, "ServerRejected({status})"),
			Failure::ServerRejected { status: None } => write!(f, "ServerRejected"),
			Failure::NoResponse => write!(f, "NoResponse"),
			Failure::RequestConstructionFailed => write!(f, "RequestConstructionFailed"),
		}
	}
}

#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct Error {
	kind: ErrorKind,
	message: Cow<'static, str>,
	status: Option<StatusCode>,
	body: Option<String>,
	#[source]
	source: Option<BoxError>,
}

impl Error {
	pub fn custom(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
		Self {
			kind,
			message: message.into(),
			status: None,
			body: None,
			source: None,
		}
	}

	pub fn custom_with_source(
		kind: ErrorKind,
		source: impl Into<BoxError>,
		context: Option<impl Into<Cow<'static, str>>>,
	) -> Self {
		let source = source.into();
		let message = match context {
			Some(context) => Cow::Owned(format!("{}: {source}", context.into())),
			None => Cow::Owned(source.to_string()),
		};
		Self {
			kind,
			message,
			status: None,
			body: None,
			source: Some(source),
		}
	}

	pub fn rejected(status: StatusCode, body: impl Into<String>) -> Self {
		let body = body.into();
		Self {
			kind: ErrorKind::ServerRejected,
			message: Cow::Owned(format!("status {status}, body: {body}")),
			status: Some(status),
			body: Some(body),
			source: None,
		}
	}

	pub(crate) fn with_status(mut self, status: StatusCode) -> Self {
		self.status = Some(status);
		self
	}

	pub fn with_context(mut self, context: impl Into<Cow<'static, str>>) -> Self {
		self.message = Cow::Owned(format!("{}: {}", context.into(), self.message));
		self
	}

	pub fn kind(&self) -> ErrorKind {
		self.kind
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	/// Status of the response that caused this error, if one arrived.
	pub fn status(&self) -> Option<StatusCode> {
		self.status
	}

	pub fn body(&self) -> Option<&str> {
		self.body.as_deref()
	}

	pub fn failure(&self) -> Failure {
		match self.kind {
			ErrorKind::ServerRejected | ErrorKind::Response => Failure::ServerRejected {
				status: self.status,
			},
			ErrorKind::NoResponse => Failure::NoResponse,
			ErrorKind::RequestConstruction | ErrorKind::Config => {
				Failure::RequestConstructionFailed
			}
		}
	}
}

impl From<reqwest::Error> for Error {
	fn from(e: reqwest::Error) -> Self {
		let kind = if e.is_builder() {
			ErrorKind::RequestConstruction
		} else if e.is_status() {
			ErrorKind::ServerRejected
		} else {
			ErrorKind::NoResponse
		};
		let status = e.status();
		let err = Self::custom_with_source(kind, e, None::<&'static str>);
		match status {
			Some(status) => err.with_status(status),
			None => err,
		}
	}
}

/// A body that arrived but did not decode.
impl From<serde_json::Error> for Error {
	fn from(e: serde_json::Error) -> Self {
		Self::custom_with_source(ErrorKind::Response, e, None::<&'static str>)
	}
}

impl From<ResponseError> for Error {
	fn from(e: ResponseError) -> Self {
		match StatusCode::from_u16(e.status()) {
			Ok(status) => Self::rejected(status, e.body()),
			Err(_) => Self::custom_with_source(ErrorKind::ServerRejected, e, None::<&'static str>),
		}
	}
}

pub trait ResultExt<T> {
	fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, Error>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
	E: Into<Error>,
{
	fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, Error> {
		self.map_err(|e| e.into().with_context(context))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rejected_classification() {
		let err = Error::rejected(StatusCode::INTERNAL_SERVER_ERROR, "err");
		assert_eq!(err.kind(), ErrorKind::ServerRejected);
		assert_eq!(err.body(), Some("err"));
		assert_eq!(
			err.failure(),
			Failure::ServerRejected {
				status: Some(StatusCode::INTERNAL_SERVER_ERROR)
			}
		);
	}

	#[test]
	fn test_kind_to_failure() {
		let cases = [
			(ErrorKind::NoResponse, Failure::NoResponse),
			(
				ErrorKind::RequestConstruction,
				Failure::RequestConstructionFailed,
			),
			(ErrorKind::Config, Failure::RequestConstructionFailed),
			(
				ErrorKind::Response,
				Failure::ServerRejected { status: None },
			),
		];
		for (kind, expected) in cases {
			assert_eq!(Error::custom(kind, "x").failure(), expected);
		}
	}

	#[test]
	fn test_response_error_conversion() {
		let err: Error = ResponseError::Rejected {
			status: 404,
			body: "{\"detail\":\"Not Found\"}".to_string(),
		}
		.into();
		assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
		assert_eq!(err.body(), Some("{\"detail\":\"Not Found\"}"));
	}

	#[test]
	fn test_context_prefixes_message() {
		let res: Result<(), Error> = Err(Error::custom(ErrorKind::Config, "bad url"));
		let err = res.context("building client").unwrap_err();
		assert_eq!(err.message(), "building client: bad url");
		assert_eq!(err.to_string(), "invalid configuration: building client: bad url");
	}
}
