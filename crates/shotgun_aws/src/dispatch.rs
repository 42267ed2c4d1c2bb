//! Batched, attributed dispatch of crawled paths into a work queue.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{SystemTime, UNIX_EPOCH};

use futures::future::try_join_all;
use serde_json::json;

use shotgun_core::message::{
    chunk_paths, PathType, ATTR_BUCKET, ATTR_PATH, ATTR_PATH_TYPE, ATTR_TARGET_BUCKET,
};

use crate::adapters::queue::{BatchEntry, WorkQueue};
use crate::error::TransportError;

/// Drains `paths` into the queue in chunks of at most the service batch
/// limit, one attributed message per path, all chunk sends in flight
/// concurrently. Consumers must not rely on any ordering between
/// messages. A failed send surfaces to the caller; re-dispatching the
/// same set is safe because orders are idempotently re-enqueueable.
pub async fn dispatch<Q: WorkQueue>(
    queue: &Q,
    queue_url: &str,
    paths: &BTreeSet<String>,
    path_type: PathType,
    source_bucket: &str,
    target_bucket: &str,
) -> Result<(), TransportError> {
    let base_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();

    let mut sequence = 0u128;
    let mut sends = Vec::new();
    for chunk in chunk_paths(paths.iter().cloned()) {
        let mut entries = Vec::with_capacity(chunk.len());
        for path in chunk {
            // Nanosecond clock reading plus a per-run sequence: collisions
            // are impossible within one dispatch run.
            let id = (base_nanos + sequence).to_string();
            sequence += 1;
            entries.push(BatchEntry {
                id,
                attributes: BTreeMap::from([
                    (ATTR_BUCKET.to_string(), source_bucket.to_string()),
                    (ATTR_TARGET_BUCKET.to_string(), target_bucket.to_string()),
                    (ATTR_PATH.to_string(), path.clone()),
                    (ATTR_PATH_TYPE.to_string(), path_type.as_str().to_string()),
                ]),
                body: path,
            });
        }
        sends.push(queue.send_batch(queue_url, entries));
    }

    try_join_all(sends).await?;
    Ok(())
}

/// Best-effort backlog observation after a dispatch. The value is
/// eventually consistent and may lag the actual enqueued count.
pub async fn report_queue_depth<Q: WorkQueue>(
    queue: &Q,
    queue_url: &str,
) -> Result<u64, TransportError> {
    let depth = queue.approximate_depth(queue_url).await?;
    eprintln!(
        "{}",
        json!({
            "component": "dispatch",
            "event": "queue_depth_reported",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": {
                "queue_url": queue_url,
                "approximate_depth": depth,
            },
        })
    );
    Ok(depth)
}
