use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Message attribute carrying the source bucket name.
pub const ATTR_BUCKET: &str = "Bucket";
/// Message attribute carrying the destination bucket name.
pub const ATTR_TARGET_BUCKET: &str = "TargetBucket";
/// Message attribute carrying the object key or directory prefix.
pub const ATTR_PATH: &str = "Path";
/// Message attribute classifying the path as `file` or `directory`.
pub const ATTR_PATH_TYPE: &str = "PathType";

/// Hard per-call batch cap of the queue service.
pub const BATCH_LIMIT: usize = 10;

/// Classification of one queued work item: a single object copy or a
/// recursive directory sync.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    File,
    Directory,
}

impl PathType {
    pub fn as_str(self) -> &'static str {
        match self {
            PathType::File => "file",
            PathType::Directory => "directory",
        }
    }

    pub fn parse(value: &str) -> Result<Self, SchemaError> {
        match value {
            "file" => Ok(PathType::File),
            "directory" => Ok(PathType::Directory),
            other => Err(SchemaError::new(format!(
                "Unknown {ATTR_PATH_TYPE} value '{other}'"
            ))),
        }
    }
}

/// The validated form of one path-queue message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationOrder {
    pub source_bucket: String,
    pub target_bucket: String,
    pub path: String,
    pub path_type: PathType,
}

impl ReplicationOrder {
    /// Strict validation of the four string attributes a path-queue
    /// message must carry. A missing, empty, or unparseable attribute is a
    /// [`SchemaError`], never a silent skip: a dropped order would
    /// silently under-replicate data.
    pub fn from_attributes(attributes: &BTreeMap<String, String>) -> Result<Self, SchemaError> {
        Ok(Self {
            source_bucket: require_attribute(attributes, ATTR_BUCKET)?,
            target_bucket: require_attribute(attributes, ATTR_TARGET_BUCKET)?,
            path: require_attribute(attributes, ATTR_PATH)?,
            path_type: PathType::parse(&require_attribute(attributes, ATTR_PATH_TYPE)?)?,
        })
    }
}

fn require_attribute(
    attributes: &BTreeMap<String, String>,
    name: &str,
) -> Result<String, SchemaError> {
    match attributes.get(name) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        Some(_) => Err(SchemaError::new(format!(
            "Message attribute '{name}' is empty"
        ))),
        None => Err(SchemaError::new(format!(
            "Message attribute '{name}' is missing"
        ))),
    }
}

/// Splits a path set into send-ready chunks of at most [`BATCH_LIMIT`]
/// entries, preserving every path exactly once.
pub fn chunk_paths<I>(paths: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let mut chunks = Vec::new();
    let mut current = Vec::with_capacity(BATCH_LIMIT);
    for path in paths {
        current.push(path);
        if current.len() == BATCH_LIMIT {
            chunks.push(std::mem::replace(&mut current, Vec::with_capacity(BATCH_LIMIT)));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// A queue message that does not satisfy the replication-order schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    message: String,
}

impl SchemaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_attributes() -> BTreeMap<String, String> {
        BTreeMap::from([
            (ATTR_BUCKET.to_string(), "source-bucket".to_string()),
            (ATTR_TARGET_BUCKET.to_string(), "target-bucket".to_string()),
            (ATTR_PATH.to_string(), "data/2021/part-0.csv".to_string()),
            (ATTR_PATH_TYPE.to_string(), "file".to_string()),
        ])
    }

    #[test]
    fn order_parses_from_complete_attributes() {
        let order =
            ReplicationOrder::from_attributes(&full_attributes()).expect("order should parse");
        assert_eq!(order.source_bucket, "source-bucket");
        assert_eq!(order.target_bucket, "target-bucket");
        assert_eq!(order.path, "data/2021/part-0.csv");
        assert_eq!(order.path_type, PathType::File);
    }

    #[test]
    fn order_rejects_missing_attribute() {
        let mut attributes = full_attributes();
        attributes.remove(ATTR_TARGET_BUCKET);

        let error =
            ReplicationOrder::from_attributes(&attributes).expect_err("order should fail");
        assert_eq!(error.message(), "Message attribute 'TargetBucket' is missing");
    }

    #[test]
    fn order_rejects_unknown_path_type() {
        let mut attributes = full_attributes();
        attributes.insert(ATTR_PATH_TYPE.to_string(), "symlink".to_string());

        let error =
            ReplicationOrder::from_attributes(&attributes).expect_err("order should fail");
        assert_eq!(error.message(), "Unknown PathType value 'symlink'");
    }

    #[test]
    fn order_rejects_empty_attribute() {
        let mut attributes = full_attributes();
        attributes.insert(ATTR_PATH.to_string(), String::new());

        let error =
            ReplicationOrder::from_attributes(&attributes).expect_err("order should fail");
        assert_eq!(error.message(), "Message attribute 'Path' is empty");
    }

    #[test]
    fn chunking_respects_batch_limit_and_keeps_every_path() {
        let paths: Vec<String> = (0..25).map(|index| format!("key-{index:02}")).collect();

        let chunks = chunk_paths(paths.clone());

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 10);
        assert_eq!(chunks[1].len(), 10);
        assert_eq!(chunks[2].len(), 5);

        let mut flattened: Vec<String> = chunks.into_iter().flatten().collect();
        flattened.sort();
        assert_eq!(flattened, paths);
    }

    #[test]
    fn chunking_empty_input_yields_no_chunks() {
        assert!(chunk_paths(Vec::new()).is_empty());
    }
}
