use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json;

use prople_pocket_core::pocket::types::{DupOrder, PocketError};

/// `Bucket` holds every value of one multi value pocket key
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(crate = "self::serde")]
pub struct Bucket {
    collections: Vec<Vec<u8>>,
}

impl Bucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(order: DupOrder, values: Vec<Vec<u8>>) -> Self {
        let mut bucket = Self::new();
        for val in values {
            bucket.add(order, val);
        }

        bucket
    }

    /// `add` inserts following the ordering discipline, false on duplicates
    pub fn add(&mut self, order: DupOrder, val: Vec<u8>) -> bool {
        order.insert(&mut self.collections, val)
    }

    /// `merge` adds every value of `other` in its own order
    pub fn merge(&mut self, order: DupOrder, other: Bucket) -> bool {
        other
            .collections
            .into_iter()
            .fold(false, |added, val| self.add(order, val) || added)
    }

    pub fn remove(&mut self, val: &[u8]) -> bool {
        let before = self.collections.len();
        self.collections.retain(|item| item.as_slice() != val);
        self.collections.len() != before
    }

    pub fn contains(&self, val: &[u8]) -> bool {
        self.collections.iter().any(|item| item.as_slice() == val)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn values(self) -> Vec<Vec<u8>> {
        self.collections
    }
}

impl TryInto<Vec<u8>> for Bucket {
    type Error = PocketError;

    fn try_into(self) -> Result<Vec<u8>, Self::Error> {
        serde_json::to_vec(&self).map_err(|err| PocketError::BucketError(err.to_string()))
    }
}

impl TryFrom<Vec<u8>> for Bucket {
    type Error = PocketError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        serde_json::from_slice(&value).map_err(|err| PocketError::BucketError(err.to_string()))
    }
}
