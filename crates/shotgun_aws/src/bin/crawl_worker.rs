use std::process::ExitCode;

use clap::Parser;

use shotgun_aws::adapters::queue::SqsWorkQueue;
use shotgun_aws::adapters::storage::S3StorageLister;
use shotgun_aws::handlers::crawl_driver::{run_crawl_driver, CrawlDriverConfig};

/// Drains the buckets queue, crawling each bucket and fanning its paths
/// out into the paths queue.
#[derive(Debug, Parser)]
#[command(name = "crawl_worker")]
struct Args {
    /// Queue holding bucket names awaiting replication.
    #[arg(long)]
    bucket_queue_url: String,
    /// Queue receiving the crawled file and directory paths.
    #[arg(long)]
    queue_url: String,
    /// Destination bucket for the replication.
    #[arg(long)]
    target_bucket: String,
    /// Optional key prefix filter.
    #[arg(long, default_value = "")]
    prefix: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let lister = S3StorageLister::new(aws_sdk_s3::Client::new(&aws_config));
    let queue = SqsWorkQueue::new(aws_sdk_sqs::Client::new(&aws_config));
    let config = CrawlDriverConfig {
        bucket_queue_url: args.bucket_queue_url,
        path_queue_url: args.queue_url,
        target_bucket: args.target_bucket,
        prefix: args.prefix,
    };

    match run_crawl_driver(&lister, &queue, &config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("crawl worker failed: {error}");
            ExitCode::FAILURE
        }
    }
}
