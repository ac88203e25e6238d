//! `cesr` provides the composable event streaming representation codec used by
//! credential attachments: fully qualified primitives, indexed signatures and
//! group counters, in both the text (qb64) and binary (qb2) domains
mod b64;

pub mod counter;
pub mod indexer;
pub mod matter;
pub mod primitive;
pub mod stream;
pub mod types;

pub use b64::{to_qb2, to_qb64};
pub use counter::{Counter, CounterCode};
pub use indexer::{IndexerCode, Siger};
pub use matter::{Diger, Matter, MatterCode, Prefixer, Seqner};
pub use primitive::{decode_primitive, encode_primitive, extract_primitive, Primitive};
pub use stream::{sniff, Cursor, Stream};
pub use types::{CesrError, Cold, Kind};
