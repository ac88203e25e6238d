//! `pocket` is the content addressed credential store contract. A pocket keeps six
//! logical tables:
//!
//! - `sers` credential SAID to raw credential bytes
//! - `seals` credential SAID to the signing event location triple
//! - `sigs` credential SAID to signatures, sorted and deduplicated
//! - `issus`, `subjs`, `schms` issuer, subject and schema to credential SAIDs in
//!   insertion order
//!
//! Substrates implement [`types::PocketBuilder`], the per table operations come
//! with [`types::PocketAPI`]
pub mod types;

mod memory;
pub use memory::InMemoryPocket;
