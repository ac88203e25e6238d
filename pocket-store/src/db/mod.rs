mod bucket;
pub use bucket::Bucket;

mod builder;
pub use builder::Builder;

pub(crate) mod merge_operators;
