//! Replication consumer: drains the paths queue and applies one copy or
//! sync per message.

use serde_json::json;

use shotgun_core::message::ReplicationOrder;

use crate::adapters::copy::ObjectCopier;
use crate::adapters::queue::WorkQueue;
use crate::error::WorkerError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    pub messages_processed: usize,
}

/// Processes messages until the queue reports empty, the success
/// termination signal. A malformed message or a failed copy is fatal:
/// skipping either would silently drop a replication unit. Messages are
/// deleted only after their copy succeeds, so a crash redelivers the
/// in-flight order.
pub async fn run_consumer<Q, C>(
    queue: &Q,
    copier: &C,
    queue_url: &str,
) -> Result<ConsumerReport, WorkerError>
where
    Q: WorkQueue,
    C: ObjectCopier,
{
    let mut report = ConsumerReport::default();

    loop {
        let Some(message) = queue.receive_one(queue_url).await? else {
            log_consumer_info(
                "queue_empty",
                json!({ "messages_processed": report.messages_processed }),
            );
            return Ok(report);
        };

        let order = ReplicationOrder::from_attributes(&message.attributes)?;
        log_consumer_info(
            "replication_started",
            json!({
                "source_bucket": order.source_bucket,
                "target_bucket": order.target_bucket,
                "path": order.path,
                "path_type": order.path_type.as_str(),
            }),
        );

        copier.replicate(&order).await.map_err(WorkerError::Copy)?;
        queue.delete(queue_url, &message.receipt_handle).await?;
        report.messages_processed += 1;
    }
}

fn log_consumer_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "replication_consumer",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
