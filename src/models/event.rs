use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{CollectorError, Result};

pub const UPDATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";
pub const HOUR_BUCKET_FORMAT: &str = "%Y-%m-%d %H:00";

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub updated_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventRecord {
    pub fn updated(&self) -> Result<DateTime<FixedOffset>> {
        DateTime::parse_from_str(&self.updated_at, UPDATED_AT_FORMAT).map_err(|source| {
            CollectorError::Timestamp {
                value: self.updated_at.clone(),
                source,
            }
        })
    }

    /// `updated_at` truncated to the hour, in its own offset.
    pub fn hour_bucket(&self) -> Result<String> {
        Ok(self.updated()?.format(HOUR_BUCKET_FORMAT).to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsPage {
    pub events: Vec<EventRecord>,
}

impl EventsPage {
    pub fn from_value(body: Value) -> Result<Self> {
        if body.is_null() {
            return Err(CollectorError::ResponseShape("empty response body".to_string()));
        }
        serde_json::from_value(body).map_err(|e| CollectorError::ResponseShape(e.to_string()))
    }
}
