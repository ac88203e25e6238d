use rst_common::with_logging::log::debug;

use rstdev_storage::engine::rocksdb::db::DB;
use rstdev_storage::engine::rocksdb::executor::Executor;
use rstdev_storage::engine::rocksdb::options::Options;

use crate::common::types::CommonError;
use crate::config::Pocket;

use super::merge_operators::{merge_bucket, MERGE_BUCKET_ID};

/// `Builder` opens the pocket column family with the bucket merge operator
/// installed, so multi value tables can grow through merges
pub struct Builder {
    pocket: Pocket,
}

impl Builder {
    pub fn new(pocket: Pocket) -> Self {
        Self { pocket }
    }

    pub fn build(&self) -> Result<Executor, CommonError> {
        let (path, cf_name) = self.pocket.get_common().get();
        let flags = self.pocket.get_db_options();
        debug!(
            "opening pocket at {} in column family {}, wal at {}",
            path,
            cf_name,
            flags.get_set_wal_dir()
        );

        let mut db_opts = Options::new(path, cf_name.clone());
        db_opts
            .build_default_opts()
            .set_db_opts(move |opt| {
                opt.create_if_missing(flags.get_create_if_missing());
                opt.create_missing_column_families(flags.get_create_missing_columns());
                opt.set_error_if_exists(flags.get_set_error_if_exists());
                opt.set_wal_dir(flags.get_set_wal_dir());
                opt
            })
            .set_cf_opts(|opt| {
                opt.set_merge_operator_associative(MERGE_BUCKET_ID, merge_bucket);
                opt
            });

        let mut db = DB::new(db_opts).map_err(|err| CommonError::DbError(err.to_string()))?;
        let instance = db
            .build()
            .map_err(|err| CommonError::DbError(err.to_string()))?;
        db.set_db(instance);

        Ok(Executor::new(db, cf_name))
    }
}
