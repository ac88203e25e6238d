//! `prople-pocket-store` provides the RocksDB substrate for credential pockets.
//!
//! A [`Repository`] implements the pocket contract from `prople-pocket-core`, so
//! it can back a `Wallet` directly. [`open_pocket`] builds one from a TOML
//! configuration file.
pub mod common;

mod config;
pub use config::{Config, Database, Pocket, RocksDBCommon, RocksDBOptions};
pub use config::Parser as ConfigManager;

mod db;
pub use db::Bucket;
pub use db::Builder as DbBuilder;

mod pocket;
pub use pocket::Repository;

use rst_common::with_logging::log::info;

use common::helpers;
use common::types::CommonError;

/// `open_pocket` parses and validates the configuration file, then opens the
/// RocksDB pocket it describes
pub fn open_pocket(conf_file: String) -> Result<Repository, CommonError> {
    let config = ConfigManager::new(conf_file.clone())
        .parse()
        .map_err(|err| CommonError::ConfigError(err.to_string()))?;

    helpers::validate(config.clone())?;

    let executor = DbBuilder::new(config.db().pocket.clone()).build()?;

    info!("pocket opened from {}", conf_file);
    Ok(Repository::new(executor))
}
