use rst_common::standard::async_trait::async_trait;
use rst_common::with_errors::thiserror::{self, Error};

use crate::credential::types::{Aid, Said};

/// `PocketError` provides all error kinds raised by a pocket substrate
#[derive(Debug, PartialEq, Clone, Error)]
pub enum PocketError {
    #[error("db error: {0}")]
    DbError(String),

    #[error("bucket error: {0}")]
    BucketError(String),

    #[error("table mismatch: {0}")]
    TableMismatch(String),
}

/// `DupOrder` is the ordering discipline of a multi value table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DupOrder {
    /// values kept sorted by their bytes, byte identical duplicates dropped
    Lexicographic,

    /// values kept in first write order, duplicates dropped
    Insertion,
}

impl DupOrder {
    /// `insert` places `val` into `vals` following the ordering discipline,
    /// returns false when the value was already present
    pub fn insert(&self, vals: &mut Vec<Vec<u8>>, val: Vec<u8>) -> bool {
        match self {
            DupOrder::Lexicographic => match vals.binary_search(&val) {
                Ok(_) => false,
                Err(pos) => {
                    vals.insert(pos, val);
                    true
                }
            },
            DupOrder::Insertion => {
                if vals.contains(&val) {
                    return false;
                }

                vals.push(val);
                true
            }
        }
    }
}

/// `Table` names the six logical tables of a pocket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Sers,
    Seals,
    Sigs,
    Issus,
    Subjs,
    Schms,
}

pub const TABLES: [Table; 6] = [
    Table::Sers,
    Table::Seals,
    Table::Sigs,
    Table::Issus,
    Table::Subjs,
    Table::Schms,
];

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Sers => "sers.",
            Table::Seals => "seals.",
            Table::Sigs => "sigs.",
            Table::Issus => "issus.",
            Table::Subjs => "subjs.",
            Table::Schms => "schms.",
        }
    }

    /// `key` builds the substrate key of an entry in this table
    pub fn key(&self, key: &str) -> String {
        format!("{}{}", self.name(), key)
    }

    /// `from_key` finds the table owning a substrate key
    pub fn from_key(key: &str) -> Option<Self> {
        TABLES.iter().find(|table| key.starts_with(table.name())).copied()
    }

    pub fn dup_order(&self) -> Option<DupOrder> {
        match self {
            Table::Sers | Table::Seals => None,
            Table::Sigs => Some(DupOrder::Lexicographic),
            Table::Issus | Table::Subjs | Table::Schms => Some(DupOrder::Insertion),
        }
    }

    pub fn expect_single(&self) -> Result<(), PocketError> {
        match self.dup_order() {
            None => Ok(()),
            Some(_) => Err(PocketError::TableMismatch(format!(
                "{} holds multiple values per key",
                self.name()
            ))),
        }
    }

    pub fn expect_dups(&self) -> Result<DupOrder, PocketError> {
        self.dup_order().ok_or(PocketError::TableMismatch(format!(
            "{} holds a single value per key",
            self.name()
        )))
    }
}

/// `PocketBuilder` is the key value contract a pocket substrate must provide.
/// Every call is isolated on its own, there is no cross table transaction
#[async_trait]
pub trait PocketBuilder: Clone + Send + Sync {
    /// writes a single value, never overwrites, returns false when the key exists
    async fn put_val(&self, table: Table, key: &str, val: Vec<u8>) -> Result<bool, PocketError>;

    /// writes a single value, overwriting any existing one
    async fn set_val(&self, table: Table, key: &str, val: Vec<u8>) -> Result<(), PocketError>;

    async fn get_val(&self, table: Table, key: &str) -> Result<Option<Vec<u8>>, PocketError>;

    async fn del_val(&self, table: Table, key: &str) -> Result<bool, PocketError>;

    /// adds each value following the table ordering, returns true when at least
    /// one value was new
    async fn put_vals(
        &self,
        table: Table,
        key: &str,
        vals: Vec<Vec<u8>>,
    ) -> Result<bool, PocketError>;

    async fn add_val(&self, table: Table, key: &str, val: Vec<u8>) -> Result<bool, PocketError>;

    async fn get_vals(&self, table: Table, key: &str) -> Result<Vec<Vec<u8>>, PocketError>;

    async fn cnt_vals(&self, table: Table, key: &str) -> Result<usize, PocketError>;

    /// deletes all values of a key, or only `val` when given
    async fn del_vals(
        &self,
        table: Table,
        key: &str,
        val: Option<Vec<u8>>,
    ) -> Result<bool, PocketError>;
}

/// `PocketAPI` names the per table operations on top of a [`PocketBuilder`]
#[async_trait]
pub trait PocketAPI: PocketBuilder {
    async fn put_sers(&self, said: &Said, raw: Vec<u8>) -> Result<bool, PocketError> {
        self.put_val(Table::Sers, said.as_str(), raw).await
    }

    async fn set_sers(&self, said: &Said, raw: Vec<u8>) -> Result<(), PocketError> {
        self.set_val(Table::Sers, said.as_str(), raw).await
    }

    async fn get_sers(&self, said: &Said) -> Result<Option<Vec<u8>>, PocketError> {
        self.get_val(Table::Sers, said.as_str()).await
    }

    async fn del_sers(&self, said: &Said) -> Result<bool, PocketError> {
        self.del_val(Table::Sers, said.as_str()).await
    }

    async fn put_seals(&self, said: &Said, triple: Vec<u8>) -> Result<bool, PocketError> {
        self.put_val(Table::Seals, said.as_str(), triple).await
    }

    async fn set_seals(&self, said: &Said, triple: Vec<u8>) -> Result<(), PocketError> {
        self.set_val(Table::Seals, said.as_str(), triple).await
    }

    async fn get_seals(&self, said: &Said) -> Result<Option<Vec<u8>>, PocketError> {
        self.get_val(Table::Seals, said.as_str()).await
    }

    async fn del_seals(&self, said: &Said) -> Result<bool, PocketError> {
        self.del_val(Table::Seals, said.as_str()).await
    }

    async fn put_sigs(&self, said: &Said, sigs: Vec<Vec<u8>>) -> Result<bool, PocketError> {
        self.put_vals(Table::Sigs, said.as_str(), sigs).await
    }

    async fn add_sig(&self, said: &Said, sig: Vec<u8>) -> Result<bool, PocketError> {
        self.add_val(Table::Sigs, said.as_str(), sig).await
    }

    async fn get_sigs(&self, said: &Said) -> Result<Vec<Vec<u8>>, PocketError> {
        self.get_vals(Table::Sigs, said.as_str()).await
    }

    async fn cnt_sigs(&self, said: &Said) -> Result<usize, PocketError> {
        self.cnt_vals(Table::Sigs, said.as_str()).await
    }

    async fn del_sigs(&self, said: &Said, sig: Option<Vec<u8>>) -> Result<bool, PocketError> {
        self.del_vals(Table::Sigs, said.as_str(), sig).await
    }

    async fn put_issus(&self, issuer: &Aid, saids: Vec<Said>) -> Result<bool, PocketError> {
        self.put_vals(Table::Issus, issuer.as_str(), to_vals(saids)).await
    }

    async fn add_issu(&self, issuer: &Aid, said: &Said) -> Result<bool, PocketError> {
        self.add_val(Table::Issus, issuer.as_str(), said.as_str().as_bytes().to_vec())
            .await
    }

    async fn get_issus(&self, issuer: &Aid) -> Result<Vec<Said>, PocketError> {
        let vals = self.get_vals(Table::Issus, issuer.as_str()).await?;
        from_vals(vals)
    }

    async fn cnt_issus(&self, issuer: &Aid) -> Result<usize, PocketError> {
        self.cnt_vals(Table::Issus, issuer.as_str()).await
    }

    async fn del_issus(&self, issuer: &Aid, said: Option<Said>) -> Result<bool, PocketError> {
        self.del_vals(Table::Issus, issuer.as_str(), said.map(to_val))
            .await
    }

    async fn put_subjs(&self, subject: &Aid, saids: Vec<Said>) -> Result<bool, PocketError> {
        self.put_vals(Table::Subjs, subject.as_str(), to_vals(saids)).await
    }

    async fn add_subj(&self, subject: &Aid, said: &Said) -> Result<bool, PocketError> {
        self.add_val(Table::Subjs, subject.as_str(), said.as_str().as_bytes().to_vec())
            .await
    }

    async fn get_subjs(&self, subject: &Aid) -> Result<Vec<Said>, PocketError> {
        let vals = self.get_vals(Table::Subjs, subject.as_str()).await?;
        from_vals(vals)
    }

    async fn cnt_subjs(&self, subject: &Aid) -> Result<usize, PocketError> {
        self.cnt_vals(Table::Subjs, subject.as_str()).await
    }

    async fn del_subjs(&self, subject: &Aid, said: Option<Said>) -> Result<bool, PocketError> {
        self.del_vals(Table::Subjs, subject.as_str(), said.map(to_val))
            .await
    }

    async fn put_schms(&self, schema: &Said, saids: Vec<Said>) -> Result<bool, PocketError> {
        self.put_vals(Table::Schms, schema.as_str(), to_vals(saids)).await
    }

    async fn add_schm(&self, schema: &Said, said: &Said) -> Result<bool, PocketError> {
        self.add_val(Table::Schms, schema.as_str(), said.as_str().as_bytes().to_vec())
            .await
    }

    async fn get_schms(&self, schema: &Said) -> Result<Vec<Said>, PocketError> {
        let vals = self.get_vals(Table::Schms, schema.as_str()).await?;
        from_vals(vals)
    }

    async fn cnt_schms(&self, schema: &Said) -> Result<usize, PocketError> {
        self.cnt_vals(Table::Schms, schema.as_str()).await
    }

    async fn del_schms(&self, schema: &Said, said: Option<Said>) -> Result<bool, PocketError> {
        self.del_vals(Table::Schms, schema.as_str(), said.map(to_val))
            .await
    }
}

impl<T: PocketBuilder> PocketAPI for T {}

fn to_val(said: Said) -> Vec<u8> {
    String::from(said).into_bytes()
}

fn to_vals(saids: Vec<Said>) -> Vec<Vec<u8>> {
    saids.into_iter().map(to_val).collect()
}

fn from_vals(vals: Vec<Vec<u8>>) -> Result<Vec<Said>, PocketError> {
    vals.into_iter()
        .map(|val| {
            String::from_utf8(val)
                .map(Said::from)
                .map_err(|err| PocketError::BucketError(err.to_string()))
        })
        .collect()
}
