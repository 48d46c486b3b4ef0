use std::{error::Error as _, sync::Arc};

use aushadhi_macros::shared_test_runtime;
use aushadhi_sdk::{
	Client, Error, ErrorKind, Failure, OperationRequest, RequestForwarder,
	api::ApiResponse,
	aushadhi_types::api::{chembl, molecules},
	diagnostics::{BodyShape, ElementShape, ValueKind},
};
use http::{Method, StatusCode};
use serde_json::json;
use test_utils::{RecordedEvent, RecordingSink, ScriptedClient, SourceMarker};

fn forwarder(
	client: ScriptedClient,
) -> (
	RequestForwarder<Arc<ScriptedClient>, Arc<RecordingSink>>,
	Arc<ScriptedClient>,
	Arc<RecordingSink>,
) {
	let client = Arc::new(client);
	let sink = Arc::new(RecordingSink::new());
	(
		RequestForwarder::new(client.clone(), sink.clone()),
		client,
		sink,
	)
}

fn hits_request(pdb_id: &str) -> chembl::Request<'_> {
	chembl::Request {
		pdb_id_input: pdb_id.into(),
	}
}

#[shared_test_runtime]
async fn test_forward_resolves_with_client_response() {
	let body = json!([{"ic50": 5, "disease_name": "X", "molecule_image": "abc"}]);
	let scripted = ApiResponse::new(StatusCode::OK, body.clone());
	let (forwarder, client, sink) =
		forwarder(ScriptedClient::new().respond_with(scripted.clone()));

	let request = hits_request("1ABC");
	let response: ApiResponse<serde_json::Value> = forwarder
		.forward(OperationRequest::new(
			"find_hits",
			chembl::ENDPOINT,
			&request,
		))
		.await
		.unwrap();

	assert_eq!(response, scripted);
	assert_eq!(
		client.calls(),
		vec![test_utils::RecordedCall {
			method: Method::POST,
			endpoint: "/fetch_chambl_data/".to_string(),
			body: Some(json!({"pdb_id_input": "1ABC"})),
		}]
	);

	let events = sink.events();
	assert_eq!(events.len(), 2);
	assert!(matches!(
		&events[0],
		RecordedEvent::Sending { operation, endpoint, payload }
			if operation == "find_hits" && endpoint == "/fetch_chambl_data/" && payload.contains("1ABC")
	));
	let RecordedEvent::Resolved {
		status,
		body: BodyShape::Sequence {
			len: 1,
			first: Some(first),
		},
		..
	} = &events[1]
	else {
		panic!("unexpected resolve event: {:?}", events[1]);
	};
	assert_eq!(*status, StatusCode::OK);
	assert_eq!(first.field("ic50"), Some(ValueKind::Number));
	assert_eq!(
		first.field("molecule_image"),
		Some(ValueKind::String { len: 3 })
	);
}

#[shared_test_runtime]
async fn test_forward_empty_sequence() {
	let scripted = ApiResponse::new(StatusCode::OK, json!([]));
	let (forwarder, _client, sink) =
		forwarder(ScriptedClient::new().respond_with(scripted.clone()));

	let request = hits_request("1ABC");
	let response: ApiResponse<serde_json::Value> = forwarder
		.forward(OperationRequest::new(
			"find_hits",
			chembl::ENDPOINT,
			&request,
		))
		.await
		.unwrap();

	assert_eq!(response, scripted);
	assert!(sink.events().contains(&RecordedEvent::Resolved {
		operation: "find_hits".to_string(),
		status: StatusCode::OK,
		body: BodyShape::Sequence { len: 0, first: None },
	}));
}

#[shared_test_runtime]
async fn test_forward_passes_server_rejection_through() {
	let (forwarder, client, sink) = forwarder(
		ScriptedClient::new().fail_with(Error::rejected(StatusCode::INTERNAL_SERVER_ERROR, "err")),
	);

	let request = hits_request("1ABC");
	let err = forwarder
		.forward::<_, serde_json::Value>(OperationRequest::new(
			"find_hits",
			chembl::ENDPOINT,
			&request,
		))
		.await
		.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::ServerRejected);
	assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
	assert_eq!(err.body(), Some("err"));
	// the forwarder must not have added anything to the error
	assert_eq!(err.message(), "status 500 Internal Server Error, body: err");
	assert_eq!(client.calls().len(), 1);

	let events = sink.events();
	let Some(RecordedEvent::Rejected {
		failure, rendered, ..
	}) = events.last()
	else {
		panic!("expected a rejection event, got {events:?}");
	};
	assert_eq!(
		*failure,
		Failure::ServerRejected {
			status: Some(StatusCode::INTERNAL_SERVER_ERROR)
		}
	);
	// the body is part of the error message and printed once
	assert_eq!(rendered.matches("body: err").count(), 1);
	assert!(!rendered.contains("body=err"));
}

#[shared_test_runtime]
async fn test_forward_passes_no_response_through() {
	let error = Error::custom_with_source(
		ErrorKind::NoResponse,
		SourceMarker(7),
		Some("connection reset"),
	);
	let (forwarder, _client, sink) = forwarder(ScriptedClient::new().fail_with(error));

	let request = hits_request("1ABC");
	let err = forwarder
		.forward::<_, serde_json::Value>(OperationRequest::new(
			"find_hits",
			chembl::ENDPOINT,
			&request,
		))
		.await
		.unwrap_err();

	assert_eq!(err.failure(), Failure::NoResponse);
	assert_eq!(err.message(), "connection reset: marker 7");
	let marker = err
		.source()
		.and_then(|s| s.downcast_ref::<SourceMarker>())
		.expect("original source is preserved");
	assert_eq!(*marker, SourceMarker(7));
	assert!(matches!(
		sink.events().last(),
		Some(RecordedEvent::Rejected {
			failure: Failure::NoResponse,
			..
		})
	));
}

#[shared_test_runtime]
async fn test_forward_passes_construction_failure_through() {
	let (forwarder, _client, sink) = forwarder(ScriptedClient::new().fail_with(Error::custom(
		ErrorKind::RequestConstruction,
		"builder error",
	)));

	let request = hits_request("1ABC");
	let err = forwarder
		.forward::<_, serde_json::Value>(OperationRequest::new(
			"find_hits",
			chembl::ENDPOINT,
			&request,
		))
		.await
		.unwrap_err();

	assert_eq!(err.failure(), Failure::RequestConstructionFailed);
	assert_eq!(err.message(), "builder error");
	assert!(matches!(
		sink.events().last(),
		Some(RecordedEvent::Rejected {
			failure: Failure::RequestConstructionFailed,
			..
		})
	));
}

#[shared_test_runtime]
async fn test_generate_alternate_mols_request() {
	let scripted = ApiResponse::new(StatusCode::OK, json!([]));
	let client = Arc::new(ScriptedClient::new().respond_with(scripted));
	let sink = Arc::new(RecordingSink::new());
	let sdk = Client::from_parts(client.clone(), sink.clone());

	let response = sdk.generate_alternate_mols("flu").await.unwrap();
	assert!(response.data.is_empty());

	assert_eq!(
		client.calls(),
		vec![test_utils::RecordedCall {
			method: Method::POST,
			endpoint: molecules::ENDPOINT.to_string(),
			body: Some(json!({"disease": "flu"})),
		}]
	);
	assert_eq!(molecules::ENDPOINT, "/alternate_molecule_generator/");
	assert!(
		sink.events()
			.iter()
			.all(|e| matches!(e, RecordedEvent::Sending { operation, .. } | RecordedEvent::Resolved { operation, .. } if operation == "generate_alternate_mols"))
	);
}

#[shared_test_runtime]
async fn test_find_hits_resolves_partial_records() {
	let body = json!([{"ic50": 5, "disease_name": "X", "molecule_image": "abc"}]);
	let client = Arc::new(
		ScriptedClient::new().respond_with(ApiResponse::new(StatusCode::OK, body)),
	);
	let sdk = Client::from_parts(client.clone(), Arc::new(RecordingSink::new()));

	let response = sdk.find_hits("1ABC").await.unwrap();
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(
		response.data,
		vec![chembl::Hit {
			ic50: Some(5.0),
			disease_name: Some("X".to_string()),
			molecule_image: Some("abc".to_string()),
			..Default::default()
		}]
	);
	assert_eq!(client.calls()[0].endpoint, chembl::ENDPOINT);
}

#[shared_test_runtime]
async fn test_typed_decode_failure_is_client_error() {
	// a body of the wrong shape still surfaces as the client's decode error
	let scripted = ApiResponse::new(StatusCode::OK, json!({"detail": "Not Found"}));
	let client = Arc::new(ScriptedClient::new().respond_with(scripted));
	let sdk = Client::from_parts(client, Arc::new(RecordingSink::new()));

	let err = sdk.find_hits("1ABC").await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Response);
}

#[shared_test_runtime]
async fn test_health_uses_get() {
	let scripted = ApiResponse::new(StatusCode::OK, json!({"status": "healthy"}));
	let client = Arc::new(ScriptedClient::new().respond_with(scripted));
	let sink = Arc::new(RecordingSink::new());
	let sdk = Client::from_parts(client.clone(), sink.clone());

	let response = sdk.health().await.unwrap();
	assert!(response.data.is_healthy());
	assert_eq!(client.calls()[0].method, Method::GET);
	assert_eq!(client.calls()[0].endpoint, "/health");
	assert!(matches!(
		sink.events().last(),
		Some(RecordedEvent::Resolved {
			body: BodyShape::Record(_),
			..
		})
	));
}

#[shared_test_runtime]
async fn test_first_element_shape_for_scalars() {
	let scripted = ApiResponse::new(StatusCode::OK, json!(["a", "b"]));
	let (forwarder, _client, sink) = forwarder(ScriptedClient::new().respond_with(scripted));

	let request = hits_request("1ABC");
	let _: ApiResponse<Vec<String>> = forwarder
		.forward(OperationRequest::new(
			"find_hits",
			chembl::ENDPOINT,
			&request,
		))
		.await
		.unwrap();

	assert!(matches!(
		sink.events().last(),
		Some(RecordedEvent::Resolved {
			body: BodyShape::Sequence {
				len: 2,
				first: Some(ElementShape::Value(ValueKind::String { len: 1 })),
			},
			..
		})
	));
}
