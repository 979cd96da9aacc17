/// A record ready to be handed to a [`Publisher`](crate::Publisher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRecord {
    pub topic: String,
    /// Encoded on the wire as a 4-byte big-endian integer; `None` sends no key.
    pub key: Option<i32>,
    pub payload: String,
    pub headers: Vec<(String, String)>,
}

impl OutboundRecord {
    pub fn new(topic: impl Into<String>, key: Option<i32>, payload: impl Into<String>) -> Self {
        OutboundRecord {
            topic: topic.into(),
            key,
            payload: payload.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn key_bytes(&self) -> Option<[u8; 4]> {
        self.key.map(i32::to_be_bytes)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Where the broker stored an acknowledged record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMetadata {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_big_endian() {
        let record = OutboundRecord::new("library-events", Some(123), "{}");
        assert_eq!(record.key_bytes(), Some([0, 0, 0, 123]));
        assert_eq!(OutboundRecord::new("t", None, "{}").key_bytes(), None);
    }

    #[test]
    fn header_lookup() {
        let record = OutboundRecord::new("t", None, "{}").with_header("event-source", "scanner");
        assert_eq!(record.header("event-source"), Some("scanner"));
        assert_eq!(record.header("missing"), None);
    }
}
