use crate::record::{OutboundRecord, RecordMetadata};
use log::{debug, error, info};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use std::time::Duration;

pub async fn publish_message(
    producer: &FutureProducer,
    record: &OutboundRecord,
) -> Result<RecordMetadata, KafkaError> {
    let key = record.key_bytes();
    let headers = record
        .headers
        .iter()
        .fold(OwnedHeaders::new(), |headers, (name, value)| {
            headers.insert(Header {
                key: name.as_str(),
                value: Some(value.as_str()),
            })
        });

    let mut future_record: FutureRecord<'_, [u8], str> = FutureRecord::to(&record.topic)
        .payload(record.payload.as_str())
        .headers(headers);
    if let Some(key) = key.as_ref() {
        future_record = future_record.key(&key[..]);
    }

    match producer.send(future_record, Duration::from_secs(0)).await {
        Ok((partition, offset)) => {
            debug!(
                "Record delivered topic={} partition={partition} offset={offset}",
                record.topic
            );
            Ok(RecordMetadata {
                topic: record.topic.clone(),
                partition,
                offset,
            })
        }
        Err((e, _)) => {
            error!("Failed to deliver record to {}: {e}", record.topic);
            Err(e)
        }
    }
}

/// Partition layout used when provisioning a topic at startup.
#[derive(Debug, Clone)]
pub struct TopicSpec {
    pub name: String,
    pub partitions: i32,
    pub replication: i32,
}

/// Creates the topic unless it already exists.
pub async fn ensure_topic(
    admin: &AdminClient<DefaultClientContext>,
    spec: &TopicSpec,
) -> Result<(), KafkaError> {
    let new_topic = NewTopic::new(
        &spec.name,
        spec.partitions,
        TopicReplication::Fixed(spec.replication),
    )
    .set("cleanup.policy", "delete");
    let results = admin
        .create_topics([&new_topic], &AdminOptions::new())
        .await?;

    for result in results {
        match result {
            Ok(topic) => {
                info!(
                    "Created topic {topic} partitions={} replication={}",
                    spec.partitions, spec.replication
                );
            }
            Err((topic, RDKafkaErrorCode::TopicAlreadyExists)) => {
                info!("Topic {topic} already exists");
            }
            Err((_, code)) => return Err(KafkaError::AdminOp(code)),
        }
    }

    Ok(())
}
