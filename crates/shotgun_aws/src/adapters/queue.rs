use std::collections::BTreeMap;
use std::future::Future;

use aws_sdk_sqs::types::{
    MessageAttributeValue, QueueAttributeName, SendMessageBatchRequestEntry,
};

use crate::error::TransportError;

/// One entry of a batched send. The id only needs to be unique within its
/// batch; all attributes are string-valued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub id: String,
    pub body: String,
    pub attributes: BTreeMap<String, String>,
}

/// One claimed queue message with its string attributes flattened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub receipt_handle: String,
    pub body: String,
    pub attributes: BTreeMap<String, String>,
}

/// Queue client boundary shared by the dispatcher, the worker loops, and
/// the backlog controller.
pub trait WorkQueue: Sync {
    fn send_batch(
        &self,
        queue_url: &str,
        entries: Vec<BatchEntry>,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Eventually-consistent backlog estimate. Observability only; callers
    /// must not treat it as exact.
    fn approximate_depth(
        &self,
        queue_url: &str,
    ) -> impl Future<Output = Result<u64, TransportError>> + Send;

    fn receive_one(
        &self,
        queue_url: &str,
    ) -> impl Future<Output = Result<Option<ReceivedMessage>, TransportError>> + Send;

    fn delete(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

#[derive(Debug, Clone)]
pub struct SqsWorkQueue {
    client: aws_sdk_sqs::Client,
}

impl SqsWorkQueue {
    pub fn new(client: aws_sdk_sqs::Client) -> Self {
        Self { client }
    }
}

impl WorkQueue for SqsWorkQueue {
    async fn send_batch(
        &self,
        queue_url: &str,
        entries: Vec<BatchEntry>,
    ) -> Result<(), TransportError> {
        let mut request = self.client.send_message_batch().queue_url(queue_url);
        for entry in entries {
            let mut builder = SendMessageBatchRequestEntry::builder()
                .id(entry.id)
                .message_body(entry.body);
            for (name, value) in entry.attributes {
                let attribute = MessageAttributeValue::builder()
                    .data_type("String")
                    .string_value(value)
                    .build()
                    .map_err(|error| TransportError::new("send_message_batch", error))?;
                builder = builder.message_attributes(name, attribute);
            }
            let entry = builder
                .build()
                .map_err(|error| TransportError::new("send_message_batch", error))?;
            request = request.entries(entry);
        }

        let response = request
            .send()
            .await
            .map_err(|error| TransportError::new("send_message_batch", error))?;
        if !response.failed().is_empty() {
            return Err(TransportError::new(
                "send_message_batch",
                format!("{} entries failed to enqueue", response.failed().len()),
            ));
        }
        Ok(())
    }

    async fn approximate_depth(&self, queue_url: &str) -> Result<u64, TransportError> {
        let response = self
            .client
            .get_queue_attributes()
            .queue_url(queue_url)
            .attribute_names(QueueAttributeName::ApproximateNumberOfMessages)
            .send()
            .await
            .map_err(|error| TransportError::new("get_queue_attributes", error))?;

        let depth = response
            .attributes()
            .and_then(|attributes| attributes.get(&QueueAttributeName::ApproximateNumberOfMessages))
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or_default();
        Ok(depth)
    }

    async fn receive_one(&self, queue_url: &str) -> Result<Option<ReceivedMessage>, TransportError> {
        let response = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .message_attribute_names("All")
            .max_number_of_messages(1)
            .send()
            .await
            .map_err(|error| TransportError::new("receive_message", error))?;

        let Some(message) = response.messages().first() else {
            return Ok(None);
        };
        let receipt_handle = message
            .receipt_handle()
            .map(str::to_string)
            .ok_or_else(|| TransportError::new("receive_message", "message without receipt handle"))?;

        let mut attributes = BTreeMap::new();
        if let Some(message_attributes) = message.message_attributes() {
            for (name, value) in message_attributes {
                if let Some(text) = value.string_value() {
                    attributes.insert(name.clone(), text.to_string());
                }
            }
        }

        Ok(Some(ReceivedMessage {
            receipt_handle,
            body: message.body().unwrap_or_default().to_string(),
            attributes,
        }))
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<(), TransportError> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| TransportError::new("delete_message", error))
    }
}
