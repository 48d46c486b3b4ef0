use std::{env, sync::OnceLock};

use aushadhi_sdk::ClientConfig;

mod mock_backend;
mod raw_server;
mod recording_sink;
mod scripted_client;

pub use mock_backend::{MockBackend, ReceivedRequest, unreachable_base_url};
pub use raw_server::RawHttpServer;
pub use recording_sink::{RecordedEvent, RecordingSink};
pub use scripted_client::{RecordedCall, ScriptedClient, SourceMarker};

static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

pub fn rt() -> &'static tokio::runtime::Runtime {
	RUNTIME.get_or_init(|| {
		let _ = env_logger::builder().is_test(true).try_init();
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.build()
			.expect("Failed to create Tokio runtime")
	})
}

/// Config for a real backend, taken from `AUSHADHI_API_URL` and the optional
/// `AUSHADHI_API_KEY` (a `.env` file is honoured). `None` when no URL is set.
pub fn live_config() -> Option<ClientConfig> {
	dotenv::dotenv().ok();
	let base_url = env::var("AUSHADHI_API_URL").ok()?;
	let config = ClientConfig::new(base_url).with_log_level(log::LevelFilter::Trace);
	Some(match env::var("AUSHADHI_API_KEY") {
		Ok(key) => config.with_api_key(key),
		Err(_) => config,
	})
}
