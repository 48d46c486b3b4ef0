use std::borrow::Cow;

use serde::{Deserialize, Serialize};

pub const ENDPOINT: &str = "/find_data_evaluation_report/";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
	pub smiles: Cow<'a, str>,
}

pub type Response = Vec<EvaluationReport>;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct EvaluationReport {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub molecule: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub molecule_name: Option<String>,
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
	pub data_analysis_report: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_report_without_activity_data() {
		let json = r#"[{"molecule": "CCO", "data_analysis_report": "Detailed analysis"}]"#;
		let reports: Response = serde_json::from_str(json).unwrap();
		assert_eq!(reports[0].molecule.as_deref(), Some("CCO"));
		assert_eq!(reports[0].ic50, None);
		assert_eq!(
			serde_json::to_string(&reports[0]).unwrap(),
			r#"{"molecule":"CCO","data_analysis_report":"Detailed analysis"}"#
		);
	}
}
