use derive_more::{AsRef, From, Into};
use the_newtype::Newtype;

use rst_common::standard::serde::{self, Deserialize, Serialize};

/// `Said` is the qb64 self-addressing identifier of a credential or a schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Newtype, From, Into, AsRef)]
#[serde(crate = "self::serde")]
pub struct Said(String);

impl Said {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Said {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// `Aid` is the qb64 autonomic identifier of an issuer or a subject
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Newtype, From, Into, AsRef)]
#[serde(crate = "self::serde")]
pub struct Aid(String);

impl Aid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Aid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
