use rst_common::standard::async_trait::async_trait;
use rst_common::with_logging::log::info;

use prople_pocket_core::cesr::{Diger, Prefixer, Seqner, Siger};
use prople_pocket_core::credential::types::Said;
use prople_pocket_core::credential::Credential;
use prople_pocket_core::wallet::types::{KeyStateVerifier, WalletAPI};
use prople_pocket_core::wallet::Wallet;
use prople_pocket_store::open_pocket;

use crate::errors::CliError;

use super::print_credential;

// Listing never ingests, nothing may pass verification
struct ReadOnly;

#[async_trait]
impl KeyStateVerifier for ReadOnly {
    async fn verify(
        &self,
        _credential: &Credential,
        _prefixer: &Prefixer,
        _seqner: &Seqner,
        _diger: &Diger,
        _sigers: &[Siger],
    ) -> bool {
        false
    }
}

/// `List` prints the credentials a pocket holds under one schema
pub struct List {
    config: String,
    schema: String,
}

impl List {
    pub fn new(config: String, schema: String) -> Self {
        Self { config, schema }
    }

    pub async fn run(&self) -> Result<usize, CliError> {
        let pocket =
            open_pocket(self.config.to_owned()).map_err(|err| CliError::PocketError(err.to_string()))?;

        let wallet = Wallet::new(pocket, ReadOnly);
        let creds = wallet
            .get_credentials(&Said::from(self.schema.as_str()))
            .await
            .map_err(|err| CliError::PocketError(err.to_string()))?;

        for (credential, proof) in creds.iter() {
            print_credential(credential, proof);
        }

        info!("{} credentials under schema {}", creds.len(), self.schema);
        Ok(creds.len())
    }
}
