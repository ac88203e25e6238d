use super::types::{CommonError, ToValidate};

pub fn validate(validator: impl ToValidate) -> Result<(), CommonError> {
    validator.validate()
}

#[cfg(test)]
pub mod testdb {
    use once_cell::sync::OnceCell;
    use std::env;
    use std::path::PathBuf;

    use rstdev_storage::engine::rocksdb::executor::Executor;

    use crate::ConfigManager;
    use crate::DbBuilder;

    pub fn fixture_file(name: &str) -> String {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("src/config/fixtures");

        format!("{}/{}", path.display(), name)
    }

    pub fn global_db_builder() -> &'static Executor {
        static INSTANCE: OnceCell<Executor> = OnceCell::new();
        INSTANCE.get_or_init(|| {
            let config_parser = ConfigManager::new(fixture_file("config.toml"));
            let config = config_parser.parse().unwrap();

            DbBuilder::new(config.db().pocket.clone()).build().unwrap()
        })
    }
}
