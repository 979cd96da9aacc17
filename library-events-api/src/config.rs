use library_event_producer::LIBRARY_EVENTS_TOPIC;
use library_event_producer::utils::TopicSpec;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub brokers: String,
    pub topic: String,
    pub partitions: i32,
    pub replication: i32,
    pub message_timeout_ms: u64,
    pub bind_address: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unparseable
    /// numbers fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Config {
            brokers: get("KAFKA_BROKERS", "localhost:9092"),
            topic: get("KAFKA_TOPIC", LIBRARY_EVENTS_TOPIC),
            partitions: parse_or(&get("KAFKA_TOPIC_PARTITIONS", "3"), 3),
            replication: parse_or(&get("KAFKA_TOPIC_REPLICATION", "1"), 1),
            message_timeout_ms: parse_or(&get("KAFKA_MESSAGE_TIMEOUT_MS", "5000"), 5000),
            bind_address: get("BIND_ADDRESS", "0.0.0.0:8080"),
        }
    }

    /// Topics to provision at startup. [`LIBRARY_EVENTS_TOPIC`] is always
    /// included because the producer-record send targets it.
    pub fn topic_specs(&self) -> Vec<TopicSpec> {
        let mut names = vec![self.topic.clone()];
        if self.topic != LIBRARY_EVENTS_TOPIC {
            names.push(LIBRARY_EVENTS_TOPIC.to_string());
        }
        names
            .into_iter()
            .map(|name| TopicSpec {
                name,
                partitions: self.partitions,
                replication: self.replication,
            })
            .collect()
    }
}

fn parse_or<T: FromStr>(value: &str, default: T) -> T {
    value.trim().parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]);
        assert_eq!(config.brokers, "localhost:9092");
        assert_eq!(config.topic, "library-events");
        assert_eq!(config.partitions, 3);
        assert_eq!(config.replication, 1);
        assert_eq!(config.message_timeout_ms, 5000);
        assert_eq!(config.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn overrides_and_bad_numbers() {
        let config = config_from(&[
            ("KAFKA_BROKERS", "kafka-1:9092,kafka-2:9092"),
            ("KAFKA_TOPIC", "library-events-dev"),
            ("KAFKA_TOPIC_PARTITIONS", "six"),
            ("KAFKA_TOPIC_REPLICATION", " 2 "),
        ]);
        assert_eq!(config.brokers, "kafka-1:9092,kafka-2:9092");
        assert_eq!(config.partitions, 3);
        assert_eq!(config.replication, 2);
        assert_eq!(config.topic, "library-events-dev");
    }

    #[test]
    fn default_topic_is_provisioned_once() {
        let specs = config_from(&[]).topic_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "library-events");
    }

    #[test]
    fn overridden_topic_also_provisions_library_events() {
        let specs = config_from(&[
            ("KAFKA_TOPIC", "library-events-dev"),
            ("KAFKA_TOPIC_REPLICATION", "2"),
        ])
        .topic_specs();

        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["library-events-dev", "library-events"]);
        assert!(specs.iter().all(|s| s.replication == 2 && s.partitions == 3));
    }
}
