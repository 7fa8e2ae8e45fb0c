use crate::error::Result;
use crate::models::event::EventRecord;
use crate::models::event_count::HourlySummary;

pub struct SummaryService;

impl SummaryService {
    /// Buckets events by the hour of `updated_at`. One bad timestamp fails the whole batch.
    pub fn summarize(events: &[EventRecord]) -> Result<HourlySummary> {
        let mut summary = HourlySummary::new();
        for event in events {
            summary.record(event.hour_bucket()?);
        }
        Ok(summary)
    }

    pub fn render_lines(summary: &HourlySummary) -> Vec<String> {
        summary
            .iter()
            .map(|(hour, count)| format!("{} : {}件", hour, count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn events(stamps: &[&str]) -> Vec<EventRecord> {
        stamps
            .iter()
            .map(|s| EventRecord {
                updated_at: s.to_string(),
                extra: Map::new(),
            })
            .collect()
    }

    #[test]
    fn summarize_groups_by_hour_in_array_order() {
        let summary = SummaryService::summarize(&events(&[
            "2024-01-01T11:00:00+0900",
            "2024-01-01T10:15:00+0900",
            "2024-01-01T10:45:00+0900",
        ]))
        .unwrap();
        assert_eq!(
            SummaryService::render_lines(&summary),
            vec![
                "2024-01-01 11:00 : 1件".to_string(),
                "2024-01-01 10:00 : 2件".to_string(),
            ]
        );
    }

    #[test]
    fn summarize_fails_on_any_bad_timestamp() {
        let result = SummaryService::summarize(&events(&[
            "2024-01-01T10:15:00+0900",
            "yesterday",
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn empty_page_gives_empty_summary() {
        let summary = SummaryService::summarize(&[]).unwrap();
        assert!(summary.is_empty());
        assert!(SummaryService::render_lines(&summary).is_empty());
    }
}
