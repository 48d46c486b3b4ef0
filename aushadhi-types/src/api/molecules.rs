use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::traits::HasMoleculeImage;

pub const ENDPOINT: &str = "/alternate_molecule_generator/";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
	pub disease: Cow<'a, str>,
}

pub type Response = Vec<AlternateMolecule>;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AlternateMolecule {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub molecule: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub molecule_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub smile_string: Option<String>,
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

impl HasMoleculeImage for AlternateMolecule {
	fn molecule_image(&self) -> Option<&str> {
		self.molecule_image.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_alternate_molecule_deserialize() {
		let json = r#"[{
			"molecule": "CCO",
			"molecule_name": "Compound_A",
			"smile_string": "CCO",
			"ic50": 0.45,
			"disease_name": "flu",
			"disease_pid": "2ABC",
			"disease_protien_name": "TP53",
			"molecule_image": ""
		}]"#;
		let molecules: Response = serde_json::from_str(json).unwrap();
		assert_eq!(molecules[0].molecule_name.as_deref(), Some("Compound_A"));
		assert_eq!(molecules[0].disease_protein_name.as_deref(), Some("TP53"));
		// an empty image string means the backend had nothing to render
		assert!(!molecules[0].has_image());
	}
}
