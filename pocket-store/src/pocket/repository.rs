use std::convert::TryInto;

use rst_common::standard::async_trait::async_trait;

use rstdev_storage::engine::rocksdb::executor::Executor;
use rstdev_storage::engine::rocksdb::types::{
    Instruction as DbInstruction, OutputOpts as DbOutput,
};

use prople_pocket_core::pocket::types::{PocketBuilder, PocketError, Table};

use crate::db::Bucket as DbBucket;

/// `Repository` is the RocksDB pocket substrate. Single value tables keep raw
/// bytes, multi value tables keep a JSON bucket per key that grows through the
/// bucket merge operator
#[derive(Clone)]
pub struct Repository {
    db: Executor,
}

impl Repository {
    pub fn new(db: Executor) -> Self {
        Self { db }
    }

    async fn get_raw(&self, key: String) -> Result<Option<Vec<u8>>, PocketError> {
        let output = self
            .db
            .exec(DbInstruction::GetCf { key })
            .await
            .map_err(|err| PocketError::DbError(err.to_string()))?;

        match output {
            DbOutput::SingleByte { value } => Ok(value),
            _ => Err(PocketError::DbError("unknown output type".to_string())),
        }
    }

    async fn save_raw(&self, key: String, value: Vec<u8>) -> Result<(), PocketError> {
        let _ = self
            .db
            .exec(DbInstruction::SaveCf { key, value })
            .await
            .map_err(|err| PocketError::DbError(err.to_string()))?;

        Ok(())
    }

    async fn remove_raw(&self, key: String) -> Result<(), PocketError> {
        let _ = self
            .db
            .exec(DbInstruction::RemoveCf { key })
            .await
            .map_err(|err| PocketError::DbError(err.to_string()))?;

        Ok(())
    }

    async fn get_bucket(&self, key: String) -> Result<Option<DbBucket>, PocketError> {
        self.get_raw(key)
            .await?
            .map(|bytes| bytes.try_into())
            .transpose()
    }

    async fn save_bucket(&self, key: String, bucket: DbBucket) -> Result<(), PocketError> {
        let bucket_bytes: Vec<u8> = bucket.try_into()?;
        self.save_raw(key, bucket_bytes).await
    }

    async fn merge_bucket(&self, key: String, bucket: DbBucket) -> Result<(), PocketError> {
        let bucket_bytes: Vec<u8> = bucket.try_into()?;
        let _ = self
            .db
            .exec(DbInstruction::MergeCf {
                key,
                value: bucket_bytes,
            })
            .await
            .map_err(|err| PocketError::DbError(err.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl PocketBuilder for Repository {
    async fn put_val(&self, table: Table, key: &str, val: Vec<u8>) -> Result<bool, PocketError> {
        table.expect_single()?;

        // read then write, a concurrent writer on the same key may win
        let key = table.key(key);
        if self.get_raw(key.clone()).await?.is_some() {
            return Ok(false);
        }

        self.save_raw(key, val).await?;
        Ok(true)
    }

    async fn set_val(&self, table: Table, key: &str, val: Vec<u8>) -> Result<(), PocketError> {
        table.expect_single()?;
        self.save_raw(table.key(key), val).await
    }

    async fn get_val(&self, table: Table, key: &str) -> Result<Option<Vec<u8>>, PocketError> {
        table.expect_single()?;
        self.get_raw(table.key(key)).await
    }

    async fn del_val(&self, table: Table, key: &str) -> Result<bool, PocketError> {
        table.expect_single()?;

        let key = table.key(key);
        if self.get_raw(key.clone()).await?.is_none() {
            return Ok(false);
        }

        self.remove_raw(key).await?;
        Ok(true)
    }

    async fn put_vals(
        &self,
        table: Table,
        key: &str,
        vals: Vec<Vec<u8>>,
    ) -> Result<bool, PocketError> {
        let order = table.expect_dups()?;
        let key = table.key(key);

        let incoming = DbBucket::from_values(order, vals);
        let stored = self.get_bucket(key.clone()).await?;

        match stored {
            Some(current) => {
                let fresh = incoming
                    .values()
                    .into_iter()
                    .filter(|val| !current.contains(val))
                    .collect::<Vec<Vec<u8>>>();

                if fresh.is_empty() {
                    return Ok(false);
                }

                self.merge_bucket(key, DbBucket::from_values(order, fresh))
                    .await?;
                Ok(true)
            }
            None => {
                if incoming.is_empty() {
                    return Ok(false);
                }

                self.save_bucket(key, incoming).await?;
                Ok(true)
            }
        }
    }

    async fn add_val(&self, table: Table, key: &str, val: Vec<u8>) -> Result<bool, PocketError> {
        self.put_vals(table, key, vec![val]).await
    }

    async fn get_vals(&self, table: Table, key: &str) -> Result<Vec<Vec<u8>>, PocketError> {
        table.expect_dups()?;

        let bucket = self.get_bucket(table.key(key)).await?;
        Ok(bucket.map(|bucket| bucket.values()).unwrap_or_default())
    }

    async fn cnt_vals(&self, table: Table, key: &str) -> Result<usize, PocketError> {
        table.expect_dups()?;

        let bucket = self.get_bucket(table.key(key)).await?;
        Ok(bucket.map(|bucket| bucket.len()).unwrap_or(0))
    }

    async fn del_vals(
        &self,
        table: Table,
        key: &str,
        val: Option<Vec<u8>>,
    ) -> Result<bool, PocketError> {
        table.expect_dups()?;

        let key = table.key(key);
        let Some(mut bucket) = self.get_bucket(key.clone()).await? else {
            return Ok(false);
        };

        let Some(val) = val else {
            self.remove_raw(key).await?;
            return Ok(true);
        };

        if !bucket.remove(&val) {
            return Ok(false);
        }

        if bucket.is_empty() {
            self.remove_raw(key).await?;
        } else {
            self.save_bucket(key, bucket).await?;
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rst_common::standard::async_trait::async_trait;
    use rst_common::standard::uuid::Uuid;
    use rst_common::with_tokio::tokio;

    use prople_pocket_core::cesr::{
        Diger, IndexerCode, MatterCode, Prefixer, Seqner, Siger, Stream,
    };
    use prople_pocket_core::credential::types::{Aid, Said};
    use prople_pocket_core::credential::Credential;
    use prople_pocket_core::pocket::types::PocketAPI;
    use prople_pocket_core::proof::Proof;
    use prople_pocket_core::wallet::types::{KeyStateVerifier, WalletAPI, WalletError};
    use prople_pocket_core::wallet::{parse_credential, Progress, Wallet};

    use crate::common::helpers::testdb;

    fn unique(prefix: &str) -> String {
        format!("{}{}", prefix, Uuid::new_v4().simple())
    }

    fn generate_repo() -> Repository {
        let db_builder = testdb::global_db_builder().to_owned();
        Repository::new(db_builder)
    }

    struct AcceptAll;

    #[async_trait]
    impl KeyStateVerifier for AcceptAll {
        async fn verify(
            &self,
            _credential: &Credential,
            _prefixer: &Prefixer,
            _seqner: &Seqner,
            _diger: &Diger,
            _sigers: &[Siger],
        ) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_single_value_never_overwritten() {
        let repo = generate_repo();
        let said = Said::from(unique("E").as_str());

        assert!(repo.put_sers(&said, b"first".to_vec()).await.unwrap());
        assert!(!repo.put_sers(&said, b"second".to_vec()).await.unwrap());
        assert_eq!(repo.get_sers(&said).await.unwrap(), Some(b"first".to_vec()));

        repo.set_sers(&said, b"second".to_vec()).await.unwrap();
        assert_eq!(
            repo.get_sers(&said).await.unwrap(),
            Some(b"second".to_vec())
        );

        assert!(repo.del_sers(&said).await.unwrap());
        assert!(!repo.del_sers(&said).await.unwrap());
        assert!(repo.get_sers(&said).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sigs_sorted_through_merge() {
        let repo = generate_repo();
        let said = Said::from(unique("E").as_str());

        assert!(repo.add_sig(&said, b"AC".to_vec()).await.unwrap());
        assert!(repo
            .put_sigs(&said, vec![b"AB".to_vec(), b"AA".to_vec()])
            .await
            .unwrap());
        assert!(!repo.add_sig(&said, b"AB".to_vec()).await.unwrap());

        let sigs = repo.get_sigs(&said).await.unwrap();
        assert_eq!(sigs, vec![b"AA".to_vec(), b"AB".to_vec(), b"AC".to_vec()]);
        assert_eq!(repo.cnt_sigs(&said).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_index_insertion_order() {
        let repo = generate_repo();
        let schema = Said::from(unique("ESchema").as_str());

        for said in ["EC", "EA", "EB"] {
            assert!(repo.add_schm(&schema, &Said::from(said)).await.unwrap());
        }

        assert!(!repo.add_schm(&schema, &Said::from("EC")).await.unwrap());
        assert_eq!(
            repo.get_schms(&schema).await.unwrap(),
            vec![Said::from("EC"), Said::from("EA"), Said::from("EB")]
        );

        assert!(repo
            .del_schms(&schema, Some(Said::from("EA")))
            .await
            .unwrap());
        assert_eq!(
            repo.get_schms(&schema).await.unwrap(),
            vec![Said::from("EC"), Said::from("EB")]
        );

        assert!(repo.del_schms(&schema, None).await.unwrap());
        assert_eq!(repo.cnt_schms(&schema).await.unwrap(), 0);
        assert!(!repo.del_schms(&schema, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_removing_last_value_drops_key() {
        let repo = generate_repo();
        let issuer = Aid::from(unique("EIssuer").as_str());

        assert!(repo.add_issu(&issuer, &Said::from("EA")).await.unwrap());
        assert!(repo
            .del_issus(&issuer, Some(Said::from("EA")))
            .await
            .unwrap());
        assert!(!repo
            .del_issus(&issuer, Some(Said::from("EA")))
            .await
            .unwrap());
        assert!(repo.get_issus(&issuer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_table_discipline() {
        let repo = generate_repo();

        let result = repo.put_val(Table::Subjs, "ESaid", b"val".to_vec()).await;
        assert!(matches!(result, Err(PocketError::TableMismatch(_))));

        let result = repo.get_vals(Table::Seals, "ESaid").await;
        assert!(matches!(result, Err(PocketError::TableMismatch(_))));
    }

    #[tokio::test]
    async fn test_wallet_end_to_end() {
        let repo = generate_repo();
        let wallet = Wallet::new(repo.clone(), AcceptAll);

        let said = Said::from(unique("E").as_str());
        let schema = Said::from(unique("ESchema").as_str());

        let credential = Credential::compose(
            said.clone(),
            Aid::from("EIssuer"),
            Aid::from("ESubject"),
            schema.clone(),
        )
        .unwrap();

        let prefixer = Prefixer::from_raw(MatterCode::Ed25519, vec![1u8; 32]).unwrap();
        let diger = Diger::from_raw(MatterCode::Blake3_256, vec![2u8; 32]).unwrap();
        let sigers = vec![
            Siger::new(IndexerCode::Ed25519Sig, 1, vec![9u8; 64]).unwrap(),
            Siger::new(IndexerCode::Ed25519Sig, 0, vec![8u8; 64]).unwrap(),
        ];
        let proof = Proof::new(prefixer, Seqner::from_sn(0), diger, sigers);

        let message = proof.attach(&credential).unwrap();
        let mut stream = Stream::from(message);

        let progress = parse_credential(&mut stream, &wallet).await.unwrap();
        assert_eq!(progress, Progress::Processed(said.clone()));

        let creds = wallet.get_credentials(&schema).await.unwrap();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].0, credential);
        assert_eq!(creds[0].1.sigers().len(), 2);
        assert_eq!(repo.cnt_sigs(&said).await.unwrap(), 2);

        repo.del_sers(&said).await.unwrap();
        let creds = wallet.get_credentials(&schema).await;
        assert!(matches!(creds, Err(WalletError::DataIntegrity(_))));
    }
}
