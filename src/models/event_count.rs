use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const CSV_HEADER: [&str; 2] = ["datetime", "event_count"];

/// One persisted line of the event count CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCountRow {
    pub datetime: String,
    pub event_count: u64,
}

impl EventCountRow {
    pub fn new(datetime: impl Into<String>, event_count: u64) -> Self {
        Self {
            datetime: datetime.into(),
            event_count,
        }
    }
}

/// Hour bucket counts, iterated in first-seen order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HourlySummary {
    buckets: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl HourlySummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, hour: String) {
        match self.index.get(&hour) {
            Some(&pos) => self.buckets[pos].1 += 1,
            None => {
                self.index.insert(hour.clone(), self.buckets.len());
                self.buckets.push((hour, 1));
            }
        }
    }

    pub fn get(&self, hour: &str) -> Option<u64> {
        self.index.get(hour).map(|&pos| self.buckets[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.buckets.iter().map(|(hour, count)| (hour.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|(_, count)| count).sum()
    }
}
