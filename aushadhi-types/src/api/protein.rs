use std::borrow::Cow;

use serde::{Deserialize, Serialize};

pub const ENDPOINT: &str = "/find_protien/";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
	pub disease: Cow<'a, str>,
}

pub type Response = Vec<TargetProtein>;

// the backend's field names are misspelled, keep them on the wire only
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct TargetProtein {
	#[serde(
		rename = "disease_protien",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub disease_protein: Option<String>,
	#[serde(
		rename = "protien_id",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub protein_id: Option<String>,
	#[serde(
		rename = "percentage_contro",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub percentage_contribution: Option<f64>,
	#[serde(
		rename = "Associated_pathway",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub associated_pathway: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_target_protein_wire_names() {
		let json = r#"[{
			"disease_protien": "TP53 (Tumor Protein P53)",
			"protien_id": "1TUP",
			"percentage_contro": 0.68,
			"Associated_pathway": "p53 ras"
		}]"#;
		let proteins: Response = serde_json::from_str(json).unwrap();
		assert_eq!(proteins.len(), 1);
		assert_eq!(proteins[0].protein_id.as_deref(), Some("1TUP"));
		assert_eq!(proteins[0].associated_pathway.as_deref(), Some("p53 ras"));
		assert_eq!(proteins[0].percentage_contribution, Some(0.68));

		let value = serde_json::to_value(&proteins[0]).unwrap();
		assert_eq!(value["disease_protien"], "TP53 (Tumor Protein P53)");
		assert!(value.get("disease_protein").is_none());
	}

	#[test]
	fn test_request_body() {
		let request = Request {
			disease: Cow::Borrowed("cancer"),
		};
		assert_eq!(
			serde_json::to_string(&request).unwrap(),
			r#"{"disease":"cancer"}"#
		);
	}
}
