use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::traits::HasMoleculeImage;

pub const ENDPOINT: &str = "/fetch_chambl_data/";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
	pub pdb_id_input: Cow<'a, str>,
}

pub type Response = Vec<Hit>;

/// A ChEMBL molecule with measured activity against the queried PDB target.
///
/// Every field is optional: hits are passed on as the backend produced them,
/// and absent fields stay absent when serialized again.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Hit {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub molecule: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub canonical_smiles: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ic50: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub disease_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub disease_pid: Option<String>,
	#[serde(
		rename = "disease_protien_name",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub disease_protein_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub molecule_image: Option<String>,
}

impl HasMoleculeImage for Hit {
	fn molecule_image(&self) -> Option<&str> {
		self.molecule_image.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const PLACEHOLDER_IMAGE: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

	#[test]
	fn test_request_body() {
		let request = Request {
			pdb_id_input: Cow::Borrowed("1ABC"),
		};
		assert_eq!(
			serde_json::to_string(&request).unwrap(),
			r#"{"pdb_id_input":"1ABC"}"#
		);
	}

	#[test]
	fn test_hit_without_image() {
		let json = r#"{
			"molecule": "CCO",
			"canonical_smiles": "CCO",
			"ic50": 0.32,
			"disease_name": "Cancer",
			"disease_pid": "1TUP",
			"disease_protien_name": "TP53"
		}"#;
		let hit: Hit = serde_json::from_str(json).unwrap();
		assert_eq!(hit.disease_protein_name.as_deref(), Some("TP53"));
		assert_eq!(hit.molecule_image, None);
		assert!(!hit.has_image());
		assert!(hit.decode_image().unwrap().is_none());
	}

	#[test]
	fn test_partial_hit_keeps_only_received_fields() {
		let json = r#"[{"ic50": 5, "disease_name": "X", "molecule_image": "abc"}]"#;
		let hits: Response = serde_json::from_str(json).unwrap();
		assert_eq!(
			hits,
			vec![Hit {
				ic50: Some(5.0),
				disease_name: Some("X".to_string()),
				molecule_image: Some("abc".to_string()),
				..Default::default()
			}]
		);
		assert_eq!(
			serde_json::to_value(&hits).unwrap(),
			serde_json::json!([{"ic50": 5.0, "disease_name": "X", "molecule_image": "abc"}])
		);
	}

	#[test]
	fn test_hit_image_decodes_to_png() {
		let hit = Hit {
			molecule_image: Some(PLACEHOLDER_IMAGE.to_string()),
			..Default::default()
		};
		let png = hit.decode_image().unwrap().unwrap();
		assert_eq!(&png[1..4], b"PNG");
	}

	#[test]
	fn test_hit_invalid_image() {
		let hit = Hit {
			molecule: Some("CCO".to_string()),
			molecule_image: Some("not base64!".to_string()),
			..Default::default()
		};
		assert!(hit.decode_image().is_err());
	}
}
