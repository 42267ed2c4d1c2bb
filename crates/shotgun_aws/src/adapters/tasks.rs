use std::future::Future;

use aws_sdk_ecs::types::{
    AssignPublicIp, AwsVpcConfiguration, DesiredStatus, LaunchType, NetworkConfiguration,
};

use crate::error::TransportError;

/// Everything needed to place new worker tasks on a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub cluster: String,
    pub task_definition: String,
    pub subnets: Vec<String>,
}

/// Compute-cluster client boundary used by the backlog controller.
pub trait TaskLauncher: Sync {
    /// Count of tasks currently in the RUNNING state on the cluster.
    fn running_count(
        &self,
        cluster: &str,
    ) -> impl Future<Output = Result<usize, TransportError>> + Send;

    fn launch(
        &self,
        spec: &LaunchSpec,
        count: usize,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

#[derive(Debug, Clone)]
pub struct EcsTaskLauncher {
    client: aws_sdk_ecs::Client,
}

impl EcsTaskLauncher {
    pub fn new(client: aws_sdk_ecs::Client) -> Self {
        Self { client }
    }
}

impl TaskLauncher for EcsTaskLauncher {
    async fn running_count(&self, cluster: &str) -> Result<usize, TransportError> {
        let mut total = 0usize;
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_tasks()
                .cluster(cluster)
                .desired_status(DesiredStatus::Running)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|error| TransportError::new("list_tasks", error))?;

            total += page.task_arns().len();
            match page.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(total)
    }

    async fn launch(&self, spec: &LaunchSpec, count: usize) -> Result<(), TransportError> {
        let vpc_configuration = AwsVpcConfiguration::builder()
            .set_subnets(Some(spec.subnets.clone()))
            .assign_public_ip(AssignPublicIp::Enabled)
            .build()
            .map_err(|error| TransportError::new("run_task", error))?;

        self.client
            .run_task()
            .cluster(&spec.cluster)
            .task_definition(&spec.task_definition)
            .count(count as i32)
            .launch_type(LaunchType::Fargate)
            .network_configuration(
                NetworkConfiguration::builder()
                    .awsvpc_configuration(vpc_configuration)
                    .build(),
            )
            .send()
            .await
            .map(|_| ())
            .map_err(|error| TransportError::new("run_task", error))
    }
}
