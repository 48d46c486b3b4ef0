use base64::{Engine, prelude::BASE64_STANDARD};

use crate::error::ConversionError;

/// Records that may carry a base64 encoded PNG rendering of their molecule.
pub trait HasMoleculeImage {
	fn molecule_image(&self) -> Option<&str>;

	fn has_image(&self) -> bool {
		self.molecule_image().is_some_and(|i| !i.is_empty())
	}

	fn decode_image(&self) -> Result<Option<Vec<u8>>, ConversionError> {
		match self.molecule_image() {
			Some(image) if !image.is_empty() => Ok(Some(BASE64_STANDARD.decode(image)?)),
			_ => Ok(None),
		}
	}
}
