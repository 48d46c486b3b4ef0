pub mod api;
pub mod auth;
pub mod config;
pub mod consts;
pub mod diagnostics;
mod discovery;
pub mod error;
pub mod forward;

pub use aushadhi_types;
pub use auth::Client;
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Failure};
pub use forward::{OperationRequest, RequestForwarder};
