//! Crawl driver: drains the buckets queue one bucket at a time, crawls
//! each bucket's key space, and fans the resulting paths out into the
//! paths queue.

use serde_json::json;

use shotgun_core::message::{PathType, ATTR_BUCKET};

use crate::adapters::queue::WorkQueue;
use crate::adapters::storage::StorageLister;
use crate::crawler::crawl;
use crate::dispatch::{dispatch, report_queue_depth};
use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlDriverConfig {
    pub bucket_queue_url: String,
    pub path_queue_url: String,
    pub target_bucket: String,
    /// Optional key prefix filter; empty crawls the whole bucket.
    pub prefix: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub buckets_processed: usize,
    pub directories_dispatched: usize,
    pub files_dispatched: usize,
}

/// Claims and crawls buckets until the buckets queue reports empty, which
/// is the sole success-termination condition. The host translates the
/// returned result into an exit status at the process boundary.
pub async fn run_crawl_driver<L, Q>(
    lister: &L,
    queue: &Q,
    config: &CrawlDriverConfig,
) -> Result<CrawlReport, TransportError>
where
    L: StorageLister,
    Q: WorkQueue,
{
    let mut report = CrawlReport::default();

    while let Some(bucket) = claim_bucket(queue, &config.bucket_queue_url).await? {
        log_driver_info(
            "bucket_claimed",
            json!({ "bucket": bucket, "prefix": config.prefix }),
        );

        let partition = crawl(lister, &bucket, &config.prefix).await?;
        dispatch(
            queue,
            &config.path_queue_url,
            &partition.directories,
            PathType::Directory,
            &bucket,
            &config.target_bucket,
        )
        .await?;
        dispatch(
            queue,
            &config.path_queue_url,
            &partition.files,
            PathType::File,
            &bucket,
            &config.target_bucket,
        )
        .await?;

        report.buckets_processed += 1;
        report.directories_dispatched += partition.directories.len();
        report.files_dispatched += partition.files.len();
        log_driver_info(
            "bucket_dispatched",
            json!({
                "bucket": bucket,
                "directories": partition.directories.len(),
                "files": partition.files.len(),
            }),
        );

        if let Err(error) = report_queue_depth(queue, &config.path_queue_url).await {
            log_driver_error("queue_depth_unavailable", json!({ "error": error.to_string() }));
        }
    }

    log_driver_info(
        "bucket_queue_drained",
        json!({
            "buckets_processed": report.buckets_processed,
            "directories_dispatched": report.directories_dispatched,
            "files_dispatched": report.files_dispatched,
        }),
    );
    Ok(report)
}

/// Receives one bucket message and deletes it immediately. Claim before
/// process: a crash mid-crawl drops that bucket rather than risking a
/// duplicate concurrent crawl of the same bucket.
async fn claim_bucket<Q: WorkQueue>(
    queue: &Q,
    bucket_queue_url: &str,
) -> Result<Option<String>, TransportError> {
    let Some(message) = queue.receive_one(bucket_queue_url).await? else {
        return Ok(None);
    };
    queue.delete(bucket_queue_url, &message.receipt_handle).await?;

    let bucket = message
        .attributes
        .get(ATTR_BUCKET)
        .cloned()
        .unwrap_or(message.body);
    Ok(Some(bucket))
}

fn log_driver_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "crawl_driver",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_driver_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "crawl_driver",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
