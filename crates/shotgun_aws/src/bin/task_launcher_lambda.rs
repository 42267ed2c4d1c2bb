use lambda_runtime::{service_fn, Error, LambdaEvent};

use shotgun_aws::adapters::queue::SqsWorkQueue;
use shotgun_aws::adapters::tasks::EcsTaskLauncher;
use shotgun_aws::handlers::launcher::{reconcile, LauncherEvent};
use shotgun_core::scaling::ScalingDecision;

async fn handle_request(event: LambdaEvent<LauncherEvent>) -> Result<ScalingDecision, Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let queue = SqsWorkQueue::new(aws_sdk_sqs::Client::new(&aws_config));
    let launcher = EcsTaskLauncher::new(aws_sdk_ecs::Client::new(&aws_config));

    reconcile(&queue, &launcher, &event.payload)
        .await
        .map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
