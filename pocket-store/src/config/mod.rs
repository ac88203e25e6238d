pub(crate) mod database;
pub use database::{Database, Pocket, RocksDBCommon, RocksDBOptions};

pub(crate) mod config;
pub use config::Config;

mod parser;
pub use parser::Parser;
