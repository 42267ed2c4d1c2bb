//! Backlog-driven scale-up of a worker fleet.
//!
//! Invoked periodically per monitored queue by an external trigger. Each
//! tick re-derives the desired fleet size from live observations and
//! carries no state between invocations, so overlapping ticks are safe
//! and a failed tick is simply retried by the next trigger.

use serde::{Deserialize, Serialize};
use serde_json::json;

use shotgun_core::scaling::{plan_scale_up, ScalingDecision, ScalingLimits};

use crate::adapters::queue::WorkQueue;
use crate::adapters::tasks::{LaunchSpec, TaskLauncher};
use crate::error::TransportError;

/// Controller invocation event. Field names follow the periodic trigger's
/// JSON payload; numeric fields accept numbers or numeric strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LauncherEvent {
    #[serde(rename = "sqsUrl")]
    pub sqs_url: String,
    #[serde(rename = "ecsCluster")]
    pub ecs_cluster: String,
    #[serde(rename = "maxTasks", deserialize_with = "number_or_string")]
    pub max_tasks: usize,
    #[serde(rename = "maxBacklog", deserialize_with = "number_or_string")]
    pub max_backlog: usize,
    #[serde(rename = "tasksStepping", deserialize_with = "number_or_string")]
    pub tasks_stepping: usize,
    #[serde(rename = "taskDefinition")]
    pub task_definition: String,
    /// Comma-joined subnet ids.
    #[serde(rename = "subnetIds")]
    pub subnet_ids: String,
}

impl LauncherEvent {
    fn limits(&self) -> ScalingLimits {
        ScalingLimits {
            max_tasks: self.max_tasks,
            max_backlog_per_task: self.max_backlog,
            step_size: self.tasks_stepping,
        }
    }

    fn launch_spec(&self) -> LaunchSpec {
        LaunchSpec {
            cluster: self.ecs_cluster.clone(),
            task_definition: self.task_definition.clone(),
            subnets: self
                .subnet_ids
                .split(',')
                .map(|subnet| subnet.trim().to_string())
                .filter(|subnet| !subnet.is_empty())
                .collect(),
        }
    }
}

/// One reconcile tick: observe backlog and running count, compute the
/// bounded scale-up, launch it, and report the decision.
pub async fn reconcile<Q, T>(
    queue: &Q,
    launcher: &T,
    event: &LauncherEvent,
) -> Result<ScalingDecision, TransportError>
where
    Q: WorkQueue,
    T: TaskLauncher,
{
    let depth = queue.approximate_depth(&event.sqs_url).await?;
    if depth == 0 {
        // Nothing queued; skip the cluster query entirely.
        return Ok(ScalingDecision {
            current_running: 0,
            desired_running: 0,
            to_launch: 0,
        });
    }

    let current_running = launcher.running_count(&event.ecs_cluster).await?;
    let decision = plan_scale_up(depth, current_running, &event.limits());
    log_launcher_info(
        "scaling_evaluated",
        json!({
            "queue_url": event.sqs_url,
            "approximate_depth": depth,
            "current_running": decision.current_running,
            "desired_running": decision.desired_running,
            "to_launch": decision.to_launch,
        }),
    );

    if decision.to_launch > 0 {
        launcher.launch(&event.launch_spec(), decision.to_launch).await?;
        log_launcher_info(
            "tasks_launched",
            json!({ "cluster": event.ecs_cluster, "count": decision.to_launch }),
        );
    }

    Ok(decision)
}

fn number_or_string<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct NumberOrString;

    impl serde::de::Visitor<'_> for NumberOrString {
        type Value = usize;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a non-negative integer or numeric string")
        }

        fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<usize, E> {
            usize::try_from(value).map_err(E::custom)
        }

        fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<usize, E> {
            usize::try_from(value).map_err(E::custom)
        }

        fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<usize, E> {
            value.trim().parse().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(NumberOrString)
}

fn log_launcher_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "task_launcher",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::adapters::queue::{BatchEntry, ReceivedMessage};

    struct FakeQueue {
        depth: u64,
    }

    impl WorkQueue for FakeQueue {
        async fn send_batch(
            &self,
            _queue_url: &str,
            _entries: Vec<BatchEntry>,
        ) -> Result<(), TransportError> {
            Ok(())
        }

        async fn approximate_depth(&self, _queue_url: &str) -> Result<u64, TransportError> {
            Ok(self.depth)
        }

        async fn receive_one(
            &self,
            _queue_url: &str,
        ) -> Result<Option<ReceivedMessage>, TransportError> {
            Ok(None)
        }

        async fn delete(
            &self,
            _queue_url: &str,
            _receipt_handle: &str,
        ) -> Result<(), TransportError> {
            Ok(())
        }
    }

    struct FakeLauncher {
        running: usize,
        launches: Mutex<Vec<(LaunchSpec, usize)>>,
    }

    impl FakeLauncher {
        fn new(running: usize) -> Self {
            Self {
                running,
                launches: Mutex::new(Vec::new()),
            }
        }

        fn launches(&self) -> Vec<(LaunchSpec, usize)> {
            self.launches.lock().expect("poisoned mutex").clone()
        }
    }

    impl TaskLauncher for FakeLauncher {
        async fn running_count(&self, _cluster: &str) -> Result<usize, TransportError> {
            Ok(self.running)
        }

        async fn launch(&self, spec: &LaunchSpec, count: usize) -> Result<(), TransportError> {
            self.launches
                .lock()
                .expect("poisoned mutex")
                .push((spec.clone(), count));
            Ok(())
        }
    }

    fn event() -> LauncherEvent {
        LauncherEvent {
            sqs_url: "https://sqs.example/paths".to_string(),
            ecs_cluster: "replication-cluster".to_string(),
            max_tasks: 500,
            max_backlog: 100,
            tasks_stepping: 10,
            task_definition: "replicate-worker:3".to_string(),
            subnet_ids: "subnet-a,subnet-b".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_queue_launches_nothing() {
        let queue = FakeQueue { depth: 0 };
        let launcher = FakeLauncher::new(3);

        let decision = reconcile(&queue, &launcher, &event())
            .await
            .expect("reconcile should pass");

        assert_eq!(decision.to_launch, 0);
        assert!(launcher.launches().is_empty());
    }

    #[tokio::test]
    async fn cold_start_launches_one_full_step() {
        let queue = FakeQueue { depth: 950 };
        let launcher = FakeLauncher::new(0);

        let decision = reconcile(&queue, &launcher, &event())
            .await
            .expect("reconcile should pass");

        assert_eq!(decision.desired_running, 10);
        assert_eq!(decision.to_launch, 10);

        let launches = launcher.launches();
        assert_eq!(launches.len(), 1);
        let (spec, count) = &launches[0];
        assert_eq!(*count, 10);
        assert_eq!(spec.cluster, "replication-cluster");
        assert_eq!(spec.task_definition, "replicate-worker:3");
        assert_eq!(spec.subnets, vec!["subnet-a".to_string(), "subnet-b".to_string()]);
    }

    #[tokio::test]
    async fn small_fleet_cap_clamps_the_launch() {
        let queue = FakeQueue { depth: 950 };
        let launcher = FakeLauncher::new(0);
        let event = LauncherEvent {
            max_tasks: 5,
            ..event()
        };

        let decision = reconcile(&queue, &launcher, &event)
            .await
            .expect("reconcile should pass");

        assert_eq!(decision.desired_running, 5);
        assert_eq!(decision.to_launch, 5);
    }

    #[tokio::test]
    async fn sufficiently_scaled_fleet_is_left_alone() {
        let queue = FakeQueue { depth: 950 };
        let launcher = FakeLauncher::new(12);

        let decision = reconcile(&queue, &launcher, &event())
            .await
            .expect("reconcile should pass");

        assert_eq!(decision.to_launch, 0);
        assert!(launcher.launches().is_empty());
    }

    #[test]
    fn event_parses_numeric_strings_from_the_trigger_payload() {
        let event: LauncherEvent = serde_json::from_value(serde_json::json!({
            "sqsUrl": "https://sqs.example/paths",
            "ecsCluster": "replication-cluster",
            "maxTasks": "500",
            "maxBacklog": "100",
            "tasksStepping": "10",
            "taskDefinition": "replicate-worker:3",
            "subnetIds": "subnet-a, subnet-b"
        }))
        .expect("event should parse");

        assert_eq!(event.max_tasks, 500);
        assert_eq!(event.max_backlog, 100);
        assert_eq!(event.tasks_stepping, 10);
        assert_eq!(event.launch_spec().subnets.len(), 2);
    }
}
