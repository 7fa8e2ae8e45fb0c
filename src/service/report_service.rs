use std::collections::HashSet;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::event::HOUR_BUCKET_FORMAT;
use crate::models::event_count::{CSV_HEADER, EventCountRow, HourlySummary};

/// How a run's summary lands in the CSV file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// Rewrite the file, one row per hour, keeping the larger count.
    #[default]
    Merge,
    /// Append a single row for the hour two hours before now.
    Delayed,
}

impl FromStr for PersistMode {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "merge" => Ok(PersistMode::Merge),
            "delayed" => Ok(PersistMode::Delayed),
            other => Err(format!("unknown persist mode: {}", other)),
        }
    }
}

impl fmt::Display for PersistMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistMode::Merge => write!(f, "merge"),
            PersistMode::Delayed => write!(f, "delayed"),
        }
    }
}

pub struct ReportService {
    path: PathBuf,
    mode: PersistMode,
    timezone: Tz,
}

impl ReportService {
    pub fn new(path: PathBuf, mode: PersistMode, timezone: Tz) -> Self {
        Self {
            path,
            mode,
            timezone,
        }
    }

    /// Persists `summary` and returns the rows this run wrote.
    pub fn persist(&self, summary: &HourlySummary, now: DateTime<Utc>) -> Result<Vec<EventCountRow>> {
        match self.mode {
            PersistMode::Merge => merge_into_csv(&self.path, summary),
            PersistMode::Delayed => {
                let row = append_delayed(&self.path, summary, now.with_timezone(&self.timezone))?;
                Ok(vec![row])
            }
        }
    }
}

/// Hour key two hours before `now`, in `now`'s timezone.
pub fn delayed_bucket<Z: TimeZone>(now: DateTime<Z>) -> String
where
    Z::Offset: fmt::Display,
{
    (now - Duration::hours(2)).format(HOUR_BUCKET_FORMAT).to_string()
}

pub fn read_rows(path: &Path) -> Result<Vec<EventCountRow>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        let row: EventCountRow = row?;
        rows.push(row);
    }
    Ok(rows)
}

/// Rewrites the file with one row per hour, raising stored counts where the summary is higher.
pub fn merge_into_csv(path: &Path, summary: &HourlySummary) -> Result<Vec<EventCountRow>> {
    if summary.is_empty() {
        debug!(path = %path.display(), "no buckets to merge");
        return Ok(Vec::new());
    }
    ensure_parent_dir(path)?;

    let mut rows = if path.is_file() {
        read_rows(path)?
    } else {
        Vec::new()
    };
    debug!(existing = rows.len(), path = %path.display(), "merging event counts");

    for row in rows.iter_mut() {
        if let Some(count) = summary.get(&row.datetime) {
            row.event_count = row.event_count.max(count);
        }
    }

    let known: HashSet<String> = rows.iter().map(|row| row.datetime.clone()).collect();
    for (hour, count) in summary.iter() {
        if !known.contains(hour) {
            rows.push(EventCountRow::new(hour, count));
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(rows = rows.len(), path = %path.display(), "event counts merged");
    Ok(rows)
}

/// Appends the count for the hour two hours before `now`, zero if that hour was not seen.
pub fn append_delayed<Z: TimeZone>(
    path: &Path,
    summary: &HourlySummary,
    now: DateTime<Z>,
) -> Result<EventCountRow>
where
    Z::Offset: fmt::Display,
{
    let hour = delayed_bucket(now);
    let count = summary.get(&hour).unwrap_or(0);
    let row = EventCountRow::new(hour, count);

    ensure_parent_dir(path)?;
    let needs_header = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if needs_header {
        writer.write_record(CSV_HEADER)?;
    }
    writer.serialize(&row)?;
    writer.flush()?;

    info!(hour = %row.datetime, count = row.event_count, path = %path.display(), "event count appended");
    Ok(row)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
