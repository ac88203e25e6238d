use rst_common::standard::async_trait::async_trait;
use rst_common::with_logging::log::{debug, info, warn};

use crate::credential::types::Said;
use crate::credential::Credential;
use crate::pocket::types::{PocketAPI, PocketBuilder};
use crate::proof::Proof;

use super::types::{KeyStateVerifier, StoredCredential, WalletAPI, WalletError};

/// `Wallet` is base logic implementation for the [`WalletAPI`]
///
/// This object depends on a pocket substrate implementing [`PocketBuilder`] and on
/// a [`KeyStateVerifier`] provided by the key event log subsystem
#[derive(Clone)]
pub struct Wallet<TPocket, TVerifier>
where
    TPocket: PocketBuilder,
    TVerifier: KeyStateVerifier,
{
    pocket: TPocket,
    verifier: TVerifier,
}

impl<TPocket, TVerifier> Wallet<TPocket, TVerifier>
where
    TPocket: PocketBuilder,
    TVerifier: KeyStateVerifier,
{
    pub fn new(pocket: TPocket, verifier: TVerifier) -> Self {
        Self { pocket, verifier }
    }

    pub fn pocket(&self) -> TPocket {
        self.pocket.clone()
    }
}

#[async_trait]
impl<TPocket, TVerifier> WalletAPI for Wallet<TPocket, TVerifier>
where
    TPocket: PocketBuilder,
    TVerifier: KeyStateVerifier,
{
    async fn process_credential(
        &self,
        credential: Credential,
        proof: Proof,
    ) -> Result<(), WalletError> {
        let verified = self
            .verifier
            .verify(
                &credential,
                proof.prefixer(),
                proof.seqner(),
                proof.diger(),
                proof.sigers(),
            )
            .await;

        if !verified {
            warn!(
                "rejected credential {} from {}",
                credential.said().as_str(),
                credential.issuer().as_str()
            );

            return Err(WalletError::UnverifiedProof(format!(
                "invalid signatures on credential {}",
                credential.said().as_str()
            )));
        }

        self.save_credential(&credential, &proof).await
    }

    async fn save_credential(
        &self,
        credential: &Credential,
        proof: &Proof,
    ) -> Result<(), WalletError> {
        let said = credential.said();

        let fresh = self.pocket.put_sers(said, credential.raw().to_vec()).await?;
        if !fresh {
            debug!("credential {} already stored", said.as_str());
        }

        self.pocket.put_seals(said, proof.seal()).await?;

        let sigs = proof.sigers().iter().map(|siger| siger.qb64b()).collect();
        self.pocket.put_sigs(said, sigs).await?;

        // indexes last, a reader never finds an index entry without its credential
        self.pocket.add_issu(credential.issuer(), said).await?;
        self.pocket.add_subj(credential.subject(), said).await?;
        self.pocket.add_schm(credential.schema(), said).await?;

        info!(
            "saved credential {} under schema {}",
            said.as_str(),
            credential.schema().as_str()
        );

        Ok(())
    }

    async fn get_credentials(&self, schema: &Said) -> Result<Vec<StoredCredential>, WalletError> {
        let saids = self.pocket.get_schms(schema).await?;
        debug!(
            "found {} credentials under schema {}",
            saids.len(),
            schema.as_str()
        );

        let mut creds = Vec::with_capacity(saids.len());
        for said in saids {
            let raw = self.pocket.get_sers(&said).await?.ok_or_else(|| {
                WalletError::DataIntegrity(format!(
                    "schema {} indexes missing credential {}",
                    schema.as_str(),
                    said.as_str()
                ))
            })?;

            let triple = self.pocket.get_seals(&said).await?.ok_or_else(|| {
                WalletError::DataIntegrity(format!("missing seal for credential {}", said.as_str()))
            })?;

            let sigs = self.pocket.get_sigs(&said).await?;
            if sigs.is_empty() {
                return Err(WalletError::DataIntegrity(format!(
                    "missing signatures for credential {}",
                    said.as_str()
                )));
            }

            let credential = Credential::from_bytes(&raw)?;
            let proof = Proof::from_seal(&triple, &sigs)?;
            creds.push((credential, proof));
        }

        Ok(creds)
    }
}
