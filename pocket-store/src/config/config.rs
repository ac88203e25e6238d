use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

use super::Database;

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(crate = "self::serde")]
pub struct Config {
    pub(super) database: Database,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn db(&self) -> &Database {
        &self.database
    }
}

impl ToValidate for Config {
    fn validate(&self) -> Result<(), CommonError> {
        self.database.validate()
    }
}
