//! `wallet` is the verify then persist pipeline for incoming credentials.
//!
//! Incoming bytes are framed by [`parse_credential`], the [`Wallet`] checks the
//! proof through a [`types::KeyStateVerifier`] and only then writes the pocket.
//! Queries by schema rebuild each credential with its proof from the pocket
pub mod types;

mod parser;
pub use parser::{extract_credential, parse_credential, Progress};

mod usecase;
pub use usecase::Wallet;
