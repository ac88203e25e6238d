use rst_common::standard::async_trait::async_trait;
use rst_common::with_errors::thiserror::{self, Error};

use crate::cesr::{CesrError, Diger, Prefixer, Seqner, Siger};
use crate::credential::types::Said;
use crate::credential::Credential;
use crate::pocket::types::PocketError;
use crate::proof::Proof;

/// `WalletError` provides all error kinds raised while processing, saving or
/// querying credentials
#[derive(Debug, PartialEq, Clone, Error)]
pub enum WalletError {
    #[error("cesr error: {0}")]
    CesrError(#[from] CesrError),

    #[error("pocket error: {0}")]
    PocketError(#[from] PocketError),

    #[error("unverified proof: {0}")]
    UnverifiedProof(String),

    #[error("data integrity error: {0}")]
    DataIntegrity(String),
}

/// `StoredCredential` is a credential rebuilt from a pocket with its proof
pub type StoredCredential = (Credential, Proof);

/// `KeyStateVerifier` checks credential signatures against the issuer's key state
/// at the given key event. It is owned by the key event log subsystem
#[async_trait]
pub trait KeyStateVerifier: Send + Sync {
    async fn verify(
        &self,
        credential: &Credential,
        prefixer: &Prefixer,
        seqner: &Seqner,
        diger: &Diger,
        sigers: &[Siger],
    ) -> bool;
}

/// `WalletAPI` is the verify then persist pipeline and its query side
#[async_trait]
pub trait WalletAPI: Send + Sync {
    /// `process_credential` verifies the proof first, nothing is written when the
    /// verifier rejects it
    async fn process_credential(
        &self,
        credential: Credential,
        proof: Proof,
    ) -> Result<(), WalletError>;

    /// `save_credential` writes the credential tables before the index tables
    async fn save_credential(&self, credential: &Credential, proof: &Proof)
        -> Result<(), WalletError>;

    /// `get_credentials` lists credentials stored under a schema in insertion order
    async fn get_credentials(&self, schema: &Said) -> Result<Vec<StoredCredential>, WalletError>;
}
