//! In-memory data products for reconstructed and simulated detector quantities.
//!
//! Every record is an immutable value once constructed, apart from the deposit ledgers in
//! [simulation::deposit_ledger], which accumulate deposits from a single producer.
pub mod analysis;
pub mod error;
pub mod reco;
pub mod simulation;

pub use error::{DataProductError, DataProductResult, SeriesField};
