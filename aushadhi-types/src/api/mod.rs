pub mod chembl;
pub mod evaluation;
pub mod health;
pub mod info;
pub mod molecules;
pub mod protein;
