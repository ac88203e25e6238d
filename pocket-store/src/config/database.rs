use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

const WAL_SUBDIR: &str = "wal";

/// `RocksDBCommon` locates the pocket database and the column family holding
/// all six pocket tables
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(crate = "self::serde")]
pub struct RocksDBCommon {
    pub(super) path: String,
    pub(super) cf_name: String,
}

impl RocksDBCommon {
    pub fn get(&self) -> (String, String) {
        (self.path.to_owned(), self.cf_name.to_owned())
    }
}

/// `RocksDBOptions` are the open flags. Every key is optional, an empty
/// `set_wal_dir` keeps the write ahead log under the database path
#[derive(Deserialize, Clone, Debug)]
#[serde(crate = "self::serde", default)]
pub struct RocksDBOptions {
    pub(super) create_if_missing: bool,
    pub(super) create_missing_columns: bool,
    pub(super) set_error_if_exists: bool,
    pub(super) set_wal_dir: String,
}

impl RocksDBOptions {
    pub fn get_create_if_missing(&self) -> bool {
        self.create_if_missing
    }

    pub fn get_create_missing_columns(&self) -> bool {
        self.create_missing_columns
    }

    pub fn get_set_error_if_exists(&self) -> bool {
        self.set_error_if_exists
    }

    pub fn get_set_wal_dir(&self) -> String {
        self.set_wal_dir.to_owned()
    }
}

impl Default for RocksDBOptions {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            create_missing_columns: true,
            set_error_if_exists: false,
            set_wal_dir: String::new(),
        }
    }
}

/// `Pocket` holds the storage settings of the credential pocket
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(crate = "self::serde")]
pub struct Pocket {
    pub(super) common: RocksDBCommon,

    #[serde(default)]
    pub(super) db: RocksDBOptions,
}

impl Pocket {
    pub fn get_common(&self) -> RocksDBCommon {
        self.common.to_owned()
    }

    /// Open flags with the write ahead log directory resolved
    pub fn get_db_options(&self) -> RocksDBOptions {
        let mut opts = self.db.to_owned();
        if opts.set_wal_dir.is_empty() {
            let path = self.common.path.trim_end_matches('/');
            opts.set_wal_dir = format!("{}/{}", path, WAL_SUBDIR);
        }

        opts
    }
}

impl ToValidate for Pocket {
    fn validate(&self) -> Result<(), CommonError> {
        let mut missing = Vec::new();
        if self.common.path.trim().is_empty() {
            missing.push("database.pocket.common.path");
        }

        if self.common.cf_name.trim().is_empty() {
            missing.push("database.pocket.common.cf_name");
        }

        if !missing.is_empty() {
            return Err(CommonError::ValidationError(format!(
                "config: missing {}",
                missing.join(", ")
            )));
        }

        if self.db.set_wal_dir == self.common.path {
            return Err(CommonError::ValidationError(
                "config: database.pocket.db.set_wal_dir must differ from the database path"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(crate = "self::serde")]
pub struct Database {
    pub pocket: Pocket,
}

impl ToValidate for Database {
    fn validate(&self) -> Result<(), CommonError> {
        self.pocket.validate()
    }
}
