use std::future::Future;

use shotgun_core::partition::is_directory_key;

use crate::error::TransportError;

/// One fully paginated delimiter-listing of a prefix's immediate
/// children, split into the three key classes the crawler cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildListing {
    /// Common-prefix entries: immediate subdirectory prefixes.
    pub subdirectories: Vec<String>,
    /// Keys without a trailing separator: real objects at this level.
    pub leaf_keys: Vec<String>,
    /// Zero-byte keys with a trailing separator: explicit directory
    /// markers returned alongside real objects.
    pub directory_marker_keys: Vec<String>,
}

/// Paginated enumeration primitive over one bucket/prefix.
pub trait StorageLister: Sync {
    fn list_children(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> impl Future<Output = Result<ChildListing, TransportError>> + Send;
}

/// S3 implementation: `ListObjectsV2` with a `/` delimiter, folding all
/// continuation pages into a single listing.
#[derive(Debug, Clone)]
pub struct S3StorageLister {
    client: aws_sdk_s3::Client,
}

impl S3StorageLister {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

impl StorageLister for S3StorageLister {
    async fn list_children(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<ChildListing, TransportError> {
        let mut listing = ChildListing::default();
        let mut continuation_token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .delimiter("/")
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|error| TransportError::new("list_objects_v2", error))?;

            for common_prefix in page.common_prefixes() {
                if let Some(path) = common_prefix.prefix() {
                    listing.subdirectories.push(path.to_string());
                }
            }
            for object in page.contents() {
                if let Some(key) = object.key() {
                    if is_directory_key(key) {
                        listing.directory_marker_keys.push(key.to_string());
                    } else {
                        listing.leaf_keys.push(key.to_string());
                    }
                }
            }

            match page.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(listing)
    }
}
