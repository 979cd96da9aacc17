use rdkafka::error::KafkaError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to serialize library event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no acknowledgement from broker within {0:?}")]
    Timeout(Duration),

    #[error("send was interrupted: {0}")]
    Interrupted(String),

    #[error("kafka send failed: {0}")]
    Kafka(#[from] KafkaError),
}
