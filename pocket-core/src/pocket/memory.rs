use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rst_common::standard::async_trait::async_trait;

use super::types::{PocketBuilder, PocketError, Table, TABLES};

type Entries = HashMap<String, Vec<Vec<u8>>>;

/// `InMemoryPocket` is a process local pocket substrate. Clones share the same
/// entries
#[derive(Debug, Clone, Default)]
pub struct InMemoryPocket {
    entries: Arc<RwLock<Entries>>,
}

impl InMemoryPocket {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Entries>, PocketError> {
        self.entries
            .read()
            .map_err(|err| PocketError::DbError(format!("lock poisoned: {}", err)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Entries>, PocketError> {
        self.entries
            .write()
            .map_err(|err| PocketError::DbError(format!("lock poisoned: {}", err)))
    }

    /// Number of keys stored in a table
    pub fn table_len(&self, table: Table) -> usize {
        self.read()
            .map(|entries| {
                entries
                    .keys()
                    .filter(|key| Table::from_key(key) == Some(table))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        TABLES.iter().map(|table| self.table_len(*table)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PocketBuilder for InMemoryPocket {
    async fn put_val(&self, table: Table, key: &str, val: Vec<u8>) -> Result<bool, PocketError> {
        table.expect_single()?;

        let mut entries = self.write()?;
        let key = table.key(key);
        if entries.contains_key(&key) {
            return Ok(false);
        }

        entries.insert(key, vec![val]);
        Ok(true)
    }

    async fn set_val(&self, table: Table, key: &str, val: Vec<u8>) -> Result<(), PocketError> {
        table.expect_single()?;

        let mut entries = self.write()?;
        entries.insert(table.key(key), vec![val]);
        Ok(())
    }

    async fn get_val(&self, table: Table, key: &str) -> Result<Option<Vec<u8>>, PocketError> {
        table.expect_single()?;

        let entries = self.read()?;
        Ok(entries
            .get(&table.key(key))
            .and_then(|vals| vals.first().cloned()))
    }

    async fn del_val(&self, table: Table, key: &str) -> Result<bool, PocketError> {
        table.expect_single()?;

        let mut entries = self.write()?;
        Ok(entries.remove(&table.key(key)).is_some())
    }

    async fn put_vals(
        &self,
        table: Table,
        key: &str,
        vals: Vec<Vec<u8>>,
    ) -> Result<bool, PocketError> {
        let order = table.expect_dups()?;

        let mut entries = self.write()?;
        let stored = entries.entry(table.key(key)).or_default();

        let mut added = false;
        for val in vals {
            added |= order.insert(stored, val);
        }

        if stored.is_empty() {
            entries.remove(&table.key(key));
        }

        Ok(added)
    }

    async fn add_val(&self, table: Table, key: &str, val: Vec<u8>) -> Result<bool, PocketError> {
        let order = table.expect_dups()?;

        let mut entries = self.write()?;
        let stored = entries.entry(table.key(key)).or_default();
        Ok(order.insert(stored, val))
    }

    async fn get_vals(&self, table: Table, key: &str) -> Result<Vec<Vec<u8>>, PocketError> {
        table.expect_dups()?;

        let entries = self.read()?;
        Ok(entries.get(&table.key(key)).cloned().unwrap_or_default())
    }

    async fn cnt_vals(&self, table: Table, key: &str) -> Result<usize, PocketError> {
        table.expect_dups()?;

        let entries = self.read()?;
        Ok(entries.get(&table.key(key)).map(|vals| vals.len()).unwrap_or(0))
    }

    async fn del_vals(
        &self,
        table: Table,
        key: &str,
        val: Option<Vec<u8>>,
    ) -> Result<bool, PocketError> {
        table.expect_dups()?;

        let mut entries = self.write()?;
        let key = table.key(key);

        let Some(val) = val else {
            return Ok(entries.remove(&key).is_some());
        };

        let Some(stored) = entries.get_mut(&key) else {
            return Ok(false);
        };

        let before = stored.len();
        stored.retain(|item| *item != val);
        let removed = stored.len() != before;

        if stored.is_empty() {
            entries.remove(&key);
        }

        Ok(removed)
    }
}
