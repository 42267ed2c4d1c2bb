use std::process::ExitCode;

use clap::Parser;

use shotgun_aws::adapters::copy::CliObjectCopier;
use shotgun_aws::adapters::queue::SqsWorkQueue;
use shotgun_aws::handlers::consumer::run_consumer;

/// Drains the paths queue, copying each file or syncing each directory
/// to its target bucket. Exits successfully once the queue is empty.
#[derive(Debug, Parser)]
#[command(name = "replicate_worker")]
struct Args {
    /// Paths queue URL.
    queue_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let queue = SqsWorkQueue::new(aws_sdk_sqs::Client::new(&aws_config));

    match run_consumer(&queue, &CliObjectCopier, &args.queue_url).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("replicate worker failed: {error}");
            ExitCode::FAILURE
        }
    }
}
