//! `proof` builds and parses the signature attachment carried by a credential:
//! one transferable indexed signature group holding the issuer's event location,
//! followed by the controller indexed signatures
mod proof;
pub use proof::{build_proof, parse_proof, Proof};
