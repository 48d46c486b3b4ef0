use std::{
	net::SocketAddr,
	sync::{Arc, Mutex},
};

use axum::{
	Json, Router,
	extract::State,
	http::{HeaderMap, StatusCode, Uri},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};

const PLACEHOLDER_IMAGE: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedRequest {
	pub path: String,
	pub authorization: Option<String>,
	pub content_type: Option<String>,
	pub body: Option<Value>,
}

#[derive(Default)]
struct BackendState {
	received: Mutex<Vec<ReceivedRequest>>,
	next_failure: Mutex<Option<(StatusCode, String)>>,
}

impl BackendState {
	fn record(&self, uri: &Uri, headers: &HeaderMap, body: Option<Value>) {
		let header = |name: &str| {
			headers
				.get(name)
				.and_then(|v| v.to_str().ok())
				.map(str::to_owned)
		};
		self.received.lock().unwrap().push(ReceivedRequest {
			path: uri.path().to_owned(),
			authorization: header("authorization"),
			content_type: header("content-type"),
			body,
		});
	}

	fn take_failure(&self) -> Option<Response> {
		self.next_failure
			.lock()
			.unwrap()
			.take()
			.map(|(status, body)| (status, body).into_response())
	}
}

/// In-process stand-in for the discovery backend, serving the same mock data
/// on the same routes. Bound to an ephemeral localhost port.
pub struct MockBackend {
	addr: SocketAddr,
	state: Arc<BackendState>,
	handle: JoinHandle<()>,
}

impl MockBackend {
	pub async fn start() -> Self {
		let state = Arc::new(BackendState::default());
		let app = Router::new()
			.route("/", get(root))
			.route("/health", get(health))
			.route("/find_protien/", post(find_protein))
			.route("/fetch_chambl_data/", post(fetch_chembl_data))
			.route("/alternate_molecule_generator/", post(alternate_molecules))
			.route("/find_data_evaluation_report/", post(evaluation_report))
			.with_state(state.clone());

		let listener = TcpListener::bind("127.0.0.1:0")
			.await
			.expect("bind mock backend");
		let addr = listener.local_addr().expect("mock backend address");
		let handle = tokio::spawn(async move {
			if let Err(e) = axum::serve(listener, app).await {
				log::error!("mock backend stopped: {e}");
			}
		});
		Self {
			addr,
			state,
			handle,
		}
	}

	pub fn base_url(&self) -> String {
		format!("http://{}", self.addr)
	}

	/// Every request seen so far, in arrival order.
	pub fn received(&self) -> Vec<ReceivedRequest> {
		self.state.received.lock().unwrap().clone()
	}

	/// Makes the next request answer with `status` and a plain text `body`
	/// instead of the route's data.
	pub fn fail_next(&self, status: StatusCode, body: impl Into<String>) {
		*self.state.next_failure.lock().unwrap() = Some((status, body.into()));
	}
}

impl Drop for MockBackend {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
	let listener = TcpListener::bind("127.0.0.1:0")
		.await
		.expect("bind throwaway listener");
	let addr = listener.local_addr().expect("throwaway listener address");
	drop(listener);
	format!("http://{addr}")
}

fn field<'a>(body: &'a Value, name: &str) -> &'a str {
	body.get(name).and_then(Value::as_str).unwrap_or_default()
}

async fn root(State(state): State<Arc<BackendState>>, uri: Uri, headers: HeaderMap) -> Response {
	state.record(&uri, &headers, None);
	if let Some(failure) = state.take_failure() {
		return failure;
	}
	Json(json!({"message": "AushadhiAI API is running"})).into_response()
}

async fn health(State(state): State<Arc<BackendState>>, uri: Uri, headers: HeaderMap) -> Response {
	state.record(&uri, &headers, None);
	if let Some(failure) = state.take_failure() {
		return failure;
	}
	Json(json!({"status": "healthy"})).into_response()
}

async fn find_protein(
	State(state): State<Arc<BackendState>>,
	uri: Uri,
	headers: HeaderMap,
	Json(body): Json<Value>,
) -> Response {
	state.record(&uri, &headers, Some(body));
	if let Some(failure) = state.take_failure() {
		return failure;
	}
	Json(json!([{
		"disease_protien": "TP53 (Tumor Protein P53)",
		"protien_id": "1TUP",
		"percentage_contro": 0.68,
		"Associated_pathway": "p53 ras"
	}]))
	.into_response()
}

async fn fetch_chembl_data(
	State(state): State<Arc<BackendState>>,
	uri: Uri,
	headers: HeaderMap,
	Json(body): Json<Value>,
) -> Response {
	let pdb_id = field(&body, "pdb_id_input").to_owned();
	state.record(&uri, &headers, Some(body));
	if let Some(failure) = state.take_failure() {
		return failure;
	}
	let hit = |smiles: &str, ic50: f64, pid: String| {
		json!({
			"molecule": smiles,
			"canonical_smiles": smiles,
			"ic50": ic50,
			"disease_name": "Cancer",
			"disease_pid": pid,
			"disease_protien_name": "TP53",
			"molecule_image": PLACEHOLDER_IMAGE
		})
	};
	Json(json!([
		hit("CC(=O)Oc1ccccc1C(=O)O", 0.32, pdb_id.clone()),
		hit("CN1C=NC2=C1C(=O)N(C(=O)N2C)C", 0.48, format!("{pdb_id}_2")),
		hit("CC(C)Cc1ccc(cc1)C(C)C(=O)O", 0.65, format!("{pdb_id}_3")),
	]))
	.into_response()
}

async fn alternate_molecules(
	State(state): State<Arc<BackendState>>,
	uri: Uri,
	headers: HeaderMap,
	Json(body): Json<Value>,
) -> Response {
	let disease = field(&body, "disease").to_owned();
	state.record(&uri, &headers, Some(body));
	if let Some(failure) = state.take_failure() {
		return failure;
	}
	let molecule = |smiles: &str, name: &str, ic50: f64, pid: &str| {
		json!({
			"molecule": smiles,
			"molecule_name": name,
			"smile_string": smiles,
			"ic50": ic50,
			"disease_name": disease,
			"disease_pid": pid,
			"disease_protien_name": "TP53",
			"molecule_image": PLACEHOLDER_IMAGE
		})
	};
	Json(json!([
		molecule("CC(=O)Oc1ccccc1C(=O)O", "Aspirin_Analog_1", 0.35, "1TUP"),
		molecule("CCO", "Compound_A", 0.45, "2ABC"),
		molecule("CC(=O)O", "Compound_B", 0.52, "3DEF"),
		molecule("c1ccccc1", "Benzene_Derivative", 0.78, "4GHI"),
	]))
	.into_response()
}

async fn evaluation_report(
	State(state): State<Arc<BackendState>>,
	uri: Uri,
	headers: HeaderMap,
	Json(body): Json<Value>,
) -> Response {
	let smiles = field(&body, "smiles").to_owned();
	state.record(&uri, &headers, Some(body));
	if let Some(failure) = state.take_failure() {
		return failure;
	}
	Json(json!([{
		"molecule": smiles,
		"molecule_name": "Compound_A",
		"ic50": 0.32,
		"disease_name": "Cancer",
		"disease_pid": "1TUP",
		"disease_protien_name": "TP53",
		"data_analysis_report": "Detailed analysis: This compound shows promising binding affinity with the target protein. Molecular weight: 180.16 g/mol. LogP: 1.31. TPSA: 37.3."
	}]))
	.into_response()
}
