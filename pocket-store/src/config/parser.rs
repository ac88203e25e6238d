use rstdev_config::format::use_toml;
use rstdev_config::parser::from_file;
use rstdev_config::{types::ConfigError, Builder};

use super::Config;

pub struct Parser {
    conf_file: String,
}

impl Parser {
    pub fn new(conf_file: String) -> Self {
        Self { conf_file }
    }

    pub fn parse(&self) -> Result<Config, ConfigError> {
        Builder::new(from_file(self.conf_file.to_owned()))
            .fetch()?
            .parse(use_toml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::helpers::{self, testdb};

    #[test]
    fn test_parse_config() {
        let parser = Parser::new(testdb::fixture_file("config.toml"));
        let config_builder = parser.parse();
        assert!(!config_builder.is_err());

        let config = config_builder.unwrap();
        let (dbpath, cfname) = config.db().pocket.get_common().get();
        assert_eq!("./pocket-storage".to_string(), dbpath);
        assert_eq!("pocket-cf".to_string(), cfname);

        let config_db_opts = config.db().pocket.get_db_options();
        assert_eq!(config_db_opts.get_set_wal_dir(), "./pocket-db-wal");
        assert!(config_db_opts.get_create_if_missing());
        assert!(config_db_opts.get_create_missing_columns());
        assert!(!config_db_opts.get_set_error_if_exists());

        assert!(helpers::validate(config).is_ok());
    }

    #[test]
    fn test_parse_missing_file() {
        let parser = Parser::new(testdb::fixture_file("missing.toml"));
        assert!(parser.parse().is_err());
    }
}
