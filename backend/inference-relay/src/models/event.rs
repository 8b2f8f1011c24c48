//! Storage trigger event parsing
//!
//! Object storage notifications arrive as
//! `{"Records": [{"obs": {"bucket": {"name": ..}, "object": {"key": .., "size": ..}}}]}`.
//! The storage section is also accepted under `s3` or `storage`.

use crate::error::{RelayError, Result};
use serde::Deserialize;

/// One storage notification, read-only once parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    pub bucket: String,
    pub key: String,
    pub size: i64,
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "Records", alias = "records")]
    records: Vec<EventRecord>,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    #[serde(alias = "s3", alias = "storage")]
    obs: StorageSection,
}

#[derive(Debug, Deserialize)]
struct StorageSection {
    bucket: BucketRef,
    object: ObjectRef,
}

#[derive(Debug, Deserialize)]
struct BucketRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ObjectRef {
    key: String,
    size: i64,
}

impl TriggerEvent {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, size: i64) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size,
        }
    }

    /// Parse the first record of a raw notification payload
    pub fn from_slice(payload: &[u8]) -> Result<Self> {
        let envelope: EventEnvelope = serde_json::from_slice(payload)
            .map_err(|e| RelayError::InvalidEvent(e.to_string()))?;

        let record = envelope
            .records
            .into_iter()
            .next()
            .ok_or_else(|| RelayError::InvalidEvent("event has no records".to_string()))?;

        Ok(Self {
            bucket: record.obs.bucket.name,
            key: record.obs.object.key,
            size: record.obs.object.size,
        })
    }

    /// Zero-size objects (folder placeholders and the like) carry nothing to process
    pub fn is_empty_object(&self) -> bool {
        self.size <= 0
    }
}
