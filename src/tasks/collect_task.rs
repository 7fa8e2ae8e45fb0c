use chrono::{DateTime, Utc};
use tracing::info;

use crate::clients::connpass_client::{EventQuery, EventSource};
use crate::config::Settings;
use crate::error::Result;
use crate::models::event::EventsPage;
use crate::models::event_count::{EventCountRow, HourlySummary};
use crate::service::report_service::ReportService;
use crate::service::summary_service::SummaryService;

#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub summary: HourlySummary,
    pub lines: Vec<String>,
    pub written: Vec<EventCountRow>,
}

/// One collector run: fetch a page, bucket it by hour, print, persist.
pub async fn run_collection<S: EventSource + ?Sized>(
    source: &S,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Result<CollectionReport> {
    let body = source.fetch_events(&EventQuery::latest_updates()).await?;
    let page = EventsPage::from_value(body)?;
    info!(events = page.events.len(), "fetched events");

    let summary = SummaryService::summarize(&page.events)?;
    let lines = SummaryService::render_lines(&summary);
    for line in &lines {
        println!("{}", line);
    }

    let reporter = ReportService::new(settings.output_path.clone(), settings.mode, settings.timezone);
    let written = reporter.persist(&summary, now)?;
    info!(
        mode = %settings.mode,
        events = summary.total(),
        buckets = summary.len(),
        rows = written.len(),
        "collection finished"
    );

    Ok(CollectionReport {
        summary,
        lines,
        written,
    })
}
