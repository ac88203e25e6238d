use rst_common::with_logging::log::warn;

use rstdev_storage::engine::rocksdb::lib::rust_rocksdb::merge_operator::MergeOperands;

use prople_pocket_core::pocket::types::{PocketError, Table};

use super::Bucket;

pub const MERGE_BUCKET_ID: &str = "merge_bucket";

fn merge_bucket_builder(existing: Option<&[u8]>) -> Option<Bucket> {
    existing.map_or_else(
        || Some(Bucket::new()),
        |val| {
            let bin_builder: Result<Bucket, PocketError> = val.to_vec().try_into();
            bin_builder.ok()
        },
    )
}

/// `merge_bucket` folds bucket operands into the stored bucket of a multi value
/// table key. Operands are buckets too, so partial merges combine the same way
pub fn merge_bucket(
    new_key: &[u8],
    existing: Option<&[u8]>,
    operands: &MergeOperands,
) -> Option<Vec<u8>> {
    let order = std::str::from_utf8(new_key)
        .ok()
        .and_then(Table::from_key)
        .and_then(|table| table.dup_order());

    let Some(order) = order else {
        return existing.map(|val| val.to_vec());
    };

    let Some(mut bucket) = merge_bucket_builder(existing) else {
        warn!(
            "stored bucket on {} is unreadable, merge aborted",
            String::from_utf8_lossy(new_key)
        );
        return None;
    };

    for op in operands {
        let op_bucket: Result<Bucket, PocketError> = op.to_vec().try_into();
        match op_bucket {
            Ok(op_bucket) => {
                bucket.merge(order, op_bucket);
            }
            Err(err) => warn!(
                "dropped merge operand of {} bytes on {}: {}",
                op.len(),
                String::from_utf8_lossy(new_key),
                err
            ),
        }
    }

    let bucket_bin_builder: Result<Vec<u8>, PocketError> = bucket.try_into();
    bucket_bin_builder.ok()
}
