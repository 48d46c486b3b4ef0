use reqwest::Url;

/// Host and port the backend binds to by default.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const USER_AGENT: &str = concat!("aushadhi-sdk/", env!("CARGO_PKG_VERSION"));

/// `endpoint` appended to the path of `base` with exactly one slash between
/// them. Query and fragment of `base` are dropped.
pub fn api_url(base: &Url, endpoint: &str) -> Url {
	let mut url = base.clone();
	url.set_path(&format!(
		"{}/{}",
		base.path().trim_end_matches('/'),
		endpoint.trim_start_matches('/')
	));
	url.set_query(None);
	url.set_fragment(None);
	url
}

#[cfg(test)]
mod tests {
	use super::*;

	fn joined(base: &str, endpoint: &str) -> String {
		api_url(&Url::parse(base).unwrap(), endpoint).to_string()
	}

	#[test]
	fn test_api_url_joins_single_slash() {
		assert_eq!(
			joined("http://localhost:8000", "/find_protien/"),
			"http://localhost:8000/find_protien/"
		);
		assert_eq!(
			joined("http://localhost:8000/", "/find_protien/"),
			"http://localhost:8000/find_protien/"
		);
		assert_eq!(joined("http://localhost:8000", "/"), "http://localhost:8000/");
	}

	#[test]
	fn test_api_url_keeps_base_path() {
		assert_eq!(
			joined("https://api.example.com/v1/", "/health"),
			"https://api.example.com/v1/health"
		);
		assert_eq!(
			joined("https://api.example.com/v1?x=1", "/find_protien/"),
			"https://api.example.com/v1/find_protien/"
		);
	}
}
