use std::future::Future;

use tokio::process::Command;

use shotgun_core::message::{PathType, ReplicationOrder};

/// Storage tier applied to every replicated object.
pub const STORAGE_CLASS: &str = "STANDARD_IA";

/// The object-copy primitive: one file copy or one recursive directory
/// sync per replication order. Implementations must be idempotent, since
/// redelivered messages repeat orders.
pub trait ObjectCopier: Sync {
    fn replicate(
        &self,
        order: &ReplicationOrder,
    ) -> impl Future<Output = Result<(), String>> + Send;
}

/// Shells out to the AWS CLI, which owns multipart transfers and
/// transport retries. The destination account is granted full ownership
/// of every copied object.
pub struct CliObjectCopier;

impl ObjectCopier for CliObjectCopier {
    async fn replicate(&self, order: &ReplicationOrder) -> Result<(), String> {
        let operation = match order.path_type {
            PathType::File => "cp",
            PathType::Directory => "sync",
        };
        let source = format!("s3://{}/{}", order.source_bucket, order.path);
        let target = format!("s3://{}/{}", order.target_bucket, order.path);

        let output = Command::new("aws")
            .args([
                "s3",
                operation,
                &source,
                &target,
                "--acl",
                "bucket-owner-full-control",
                "--storage-class",
                STORAGE_CLASS,
                "--cli-connect-timeout",
                "0",
            ])
            .output()
            .await
            .map_err(|error| format!("failed to spawn aws cli: {error}"))?;

        if !output.status.success() {
            return Err(format!(
                "aws s3 {operation} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(())
    }
}
