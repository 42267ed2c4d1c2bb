use std::collections::BTreeMap;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use serde_json::json;

use shotgun_aws::adapters::queue::{BatchEntry, SqsWorkQueue, WorkQueue};
use shotgun_core::message::{chunk_paths, ATTR_BUCKET};

/// Seeds the buckets queue with bucket names awaiting replication.
#[derive(Debug, Parser)]
#[command(name = "push_buckets")]
struct Args {
    /// Buckets queue URL.
    #[arg(long)]
    queue_url: String,
    /// Bucket name to enqueue; repeat the flag for multiple buckets.
    #[arg(long = "bucket", required = true)]
    buckets: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let queue = SqsWorkQueue::new(aws_sdk_sqs::Client::new(&aws_config));

    match push(&queue, &args.queue_url, args.buckets).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("push buckets failed: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn push(
    queue: &SqsWorkQueue,
    queue_url: &str,
    buckets: Vec<String>,
) -> Result<(), shotgun_aws::error::TransportError> {
    let base_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();

    let mut sequence = 0u128;
    for chunk in chunk_paths(buckets) {
        let mut entries = Vec::with_capacity(chunk.len());
        for bucket in chunk {
            let id = (base_nanos + sequence).to_string();
            sequence += 1;
            entries.push(BatchEntry {
                id,
                attributes: BTreeMap::from([(ATTR_BUCKET.to_string(), bucket.clone())]),
                body: bucket,
            });
        }
        queue.send_batch(queue_url, entries).await?;
    }

    let depth = queue.approximate_depth(queue_url).await?;
    eprintln!(
        "{}",
        json!({
            "component": "push_buckets",
            "event": "buckets_enqueued",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": { "queue_url": queue_url, "approximate_depth": depth },
        })
    );
    Ok(())
}
