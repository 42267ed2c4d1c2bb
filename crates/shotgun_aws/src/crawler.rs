//! Bounded-depth concurrent crawl of a bucket's key space.
//!
//! Sibling subdirectories are listed concurrently; the parent joins all
//! children before merging, so the merged sets are never written while a
//! child is still in flight. Below [`MAX_DEPTH`] a subtree stops being
//! enumerated and is delegated as one opaque directory work item, which
//! bounds fan-out cost on pathological trees.

use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;

use shotgun_core::partition::{PartitionResult, MAX_DEPTH};

use crate::adapters::storage::{ChildListing, StorageLister};
use crate::error::TransportError;

/// Partitions the key space under `prefix` into directory prefixes and
/// stray file keys. A listing error anywhere in the subtree fails the
/// whole call; partial enumerations would silently under-replicate.
pub async fn crawl<L: StorageLister>(
    lister: &L,
    bucket: &str,
    prefix: &str,
) -> Result<PartitionResult, TransportError> {
    crawl_subtree(lister, bucket, prefix.to_string(), 0).await
}

fn crawl_subtree<'a, L: StorageLister>(
    lister: &'a L,
    bucket: &'a str,
    prefix: String,
    depth: u32,
) -> BoxFuture<'a, Result<PartitionResult, TransportError>> {
    async move {
        let ChildListing {
            subdirectories,
            leaf_keys,
            directory_marker_keys,
        } = lister.list_children(bucket, &prefix).await?;

        let mut result = PartitionResult::new();
        result.files.extend(leaf_keys);

        if !subdirectories.is_empty() && depth < MAX_DEPTH {
            let children = subdirectories
                .into_iter()
                .map(|subdirectory| crawl_subtree(lister, bucket, subdirectory, depth + 1));
            for child in try_join_all(children).await? {
                result.merge(child);
            }
        } else {
            result.directories.extend(subdirectories);
            result.directories.extend(directory_marker_keys);
        }

        Ok(result)
    }
    .boxed()
}
