pub mod domain;
pub mod error;
pub mod record;
pub mod utils;

pub use domain::{Book, FieldError, LibraryEvent, LibraryEventType, ValidationErrors};
pub use error::DispatchError;
pub use record::{OutboundRecord, RecordMetadata};

use log::{error, info};
use rdkafka::error::KafkaError;
use rdkafka::producer::FutureProducer;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Topic used by the producer-record send, independent of the configured default.
pub const LIBRARY_EVENTS_TOPIC: &str = "library-events";

/// How long a synchronous send waits for the broker acknowledgement.
pub const SYNC_SEND_TIMEOUT: Duration = Duration::from_secs(1);

pub const EVENT_SOURCE_HEADER: &str = "event-source";
pub const EVENT_SOURCE: &str = "scanner";

pub trait Publisher {
    fn publish(
        &self,
        record: OutboundRecord,
    ) -> impl Future<Output = Result<RecordMetadata, KafkaError>> + Send;
}

#[derive(Clone)]
pub struct KafkaPublisher {
    pub producer: FutureProducer,
}

impl KafkaPublisher {
    pub fn new(producer: FutureProducer) -> Self {
        KafkaPublisher { producer }
    }
}

impl Publisher for KafkaPublisher {
    fn publish(
        &self,
        record: OutboundRecord,
    ) -> impl Future<Output = Result<RecordMetadata, KafkaError>> + Send {
        let producer = self.producer.clone();
        async move { utils::publish_message(&producer, &record).await }
    }
}

/// Completion of an asynchronous send. Dropping it detaches the send; the
/// outcome is still logged.
pub type DispatchHandle = JoinHandle<Result<RecordMetadata, DispatchError>>;

#[derive(Clone)]
pub struct LibraryEventProducer<P> {
    publisher: P,
    default_topic: String,
}

impl<P> LibraryEventProducer<P>
where
    P: Publisher + Clone + Send + Sync + 'static,
{
    pub fn new(publisher: P, default_topic: impl Into<String>) -> Self {
        LibraryEventProducer {
            publisher,
            default_topic: default_topic.into(),
        }
    }

    /// Sends to the default topic and waits up to [`SYNC_SEND_TIMEOUT`] for
    /// the acknowledgement. A timed out send is left in flight.
    pub async fn send_library_event_synchronous(
        &self,
        event: &LibraryEvent,
    ) -> Result<RecordMetadata, DispatchError> {
        let record = self.default_record(event)?;
        let key = record.key;
        let publisher = self.publisher.clone();
        let send = tokio::spawn(async move { publisher.publish(record).await });

        match tokio::time::timeout(SYNC_SEND_TIMEOUT, send).await {
            Ok(Ok(Ok(metadata))) => {
                info!(
                    "Library event sent synchronously key={key:?} topic={} partition={}",
                    metadata.topic, metadata.partition
                );
                Ok(metadata)
            }
            Ok(Ok(Err(e))) => {
                error!("Synchronous send failed for key={key:?}: {e}");
                Err(DispatchError::Kafka(e))
            }
            Ok(Err(join_error)) => {
                error!("Synchronous send interrupted for key={key:?}: {join_error}");
                Err(DispatchError::Interrupted(join_error.to_string()))
            }
            Err(_) => {
                error!(
                    "Synchronous send for key={key:?} not acknowledged within {SYNC_SEND_TIMEOUT:?}"
                );
                Err(DispatchError::Timeout(SYNC_SEND_TIMEOUT))
            }
        }
    }

    /// Submits to the default topic without waiting for the broker.
    pub fn send_library_event_asynchronous(
        &self,
        event: &LibraryEvent,
    ) -> Result<DispatchHandle, DispatchError> {
        let record = self.default_record(event)?;
        Ok(self.dispatch(record))
    }

    /// Submits to [`LIBRARY_EVENTS_TOPIC`] with the event source header attached.
    pub fn send_library_event_with_record(
        &self,
        event: &LibraryEvent,
    ) -> Result<DispatchHandle, DispatchError> {
        let record =
            build_producer_record(event.library_event_id, event.to_json()?, LIBRARY_EVENTS_TOPIC);
        Ok(self.dispatch(record))
    }

    fn default_record(&self, event: &LibraryEvent) -> Result<OutboundRecord, DispatchError> {
        Ok(OutboundRecord::new(
            &self.default_topic,
            event.library_event_id,
            event.to_json()?,
        ))
    }

    fn dispatch(&self, record: OutboundRecord) -> DispatchHandle {
        let publisher = self.publisher.clone();
        tokio::spawn(async move {
            let key = record.key;
            let value = record.payload.clone();
            match publisher.publish(record).await {
                Ok(metadata) => {
                    handle_success(key, &value, &metadata);
                    Ok(metadata)
                }
                Err(e) => {
                    handle_failure(key, &e);
                    Err(DispatchError::Kafka(e))
                }
            }
        })
    }
}

fn build_producer_record(key: Option<i32>, value: String, topic: &str) -> OutboundRecord {
    OutboundRecord::new(topic, key, value).with_header(EVENT_SOURCE_HEADER, EVENT_SOURCE)
}

fn handle_success(key: Option<i32>, value: &str, metadata: &RecordMetadata) {
    info!(
        "Library event sent key={key:?} value={value} partition={}",
        metadata.partition
    );
}

fn handle_failure(key: Option<i32>, e: &KafkaError) {
    error!("Error sending library event key={key:?}: {e}");
}
