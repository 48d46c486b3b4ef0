use std::borrow::Cow;

use crate::{
	Error,
	api::{self, ApiResponse},
	auth::{Client, http::AuthorizedClient},
	diagnostics::DiagnosticSink,
};

impl<C, S> Client<C, S>
where
	C: AuthorizedClient,
	S: DiagnosticSink,
{
	/// Target proteins associated with a disease.
	pub async fn find_target_protein(
		&self,
		disease: &str,
	) -> Result<ApiResponse<api::protein::Response>, Error> {
		api::protein::post(
			self.forwarder(),
			&api::protein::Request {
				disease: Cow::Borrowed(disease),
			},
		)
		.await
	}

	/// ChEMBL hits for a PDB structure id.
	pub async fn find_hits(
		&self,
		pdb_id: &str,
	) -> Result<ApiResponse<api::chembl::Response>, Error> {
		api::chembl::post(
			self.forwarder(),
			&api::chembl::Request {
				pdb_id_input: Cow::Borrowed(pdb_id),
			},
		)
		.await
	}

	pub async fn generate_alternate_mols(
		&self,
		disease: &str,
	) -> Result<ApiResponse<api::molecules::Response>, Error> {
		api::molecules::post(
			self.forwarder(),
			&api::molecules::Request {
				disease: Cow::Borrowed(disease),
			},
		)
		.await
	}

	/// Evaluation report for a molecule given as a SMILES string.
	pub async fn show_evaluation(
		&self,
		smiles: &str,
	) -> Result<ApiResponse<api::evaluation::Response>, Error> {
		api::evaluation::post(
			self.forwarder(),
			&api::evaluation::Request {
				smiles: Cow::Borrowed(smiles),
			},
		)
		.await
	}

	pub async fn health(&self) -> Result<ApiResponse<api::health::Response>, Error> {
		api::health::get(self.forwarder()).await
	}

	pub async fn service_info(&self) -> Result<ApiResponse<api::info::Response>, Error> {
		api::info::get(self.forwarder()).await
	}
}
