//! `credential` holds the serialized credential body and the identifiers it is
//! indexed by. Bodies are self framing through their version string
pub mod types;
pub mod version;

mod credential;
pub use credential::Credential;
