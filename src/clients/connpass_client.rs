use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::error::{CollectorError, Result};

// The event API answers 403 to reqwest's default user agent.
const USER_AGENT: &str = "curl/7.81.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Filters accepted by the event search endpoint. `None` fields are never sent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub event_id: Option<String>,
    pub keyword: Option<String>,
    pub keyword_or: Option<String>,
    pub ym: Option<u32>,
    pub ymd: Option<u32>,
    pub nickname: Option<String>,
    pub owner_nickname: Option<String>,
    pub series_id: Option<u64>,
    pub start: Option<u32>,
    pub order: Option<u32>,
    pub count: Option<u32>,
    pub format: Option<String>,
}

impl EventQuery {
    /// Newest-updated first, one full page.
    pub fn latest_updates() -> Self {
        Self {
            order: Some(1),
            count: Some(100),
            ..Self::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let fields: [(&'static str, Option<String>); 12] = [
            ("event_id", self.event_id.clone()),
            ("keyword", self.keyword.clone()),
            ("keyword_or", self.keyword_or.clone()),
            ("ym", self.ym.map(|v| v.to_string())),
            ("ymd", self.ymd.map(|v| v.to_string())),
            ("nickname", self.nickname.clone()),
            ("owner_nickname", self.owner_nickname.clone()),
            ("series_id", self.series_id.map(|v| v.to_string())),
            ("start", self.start.map(|v| v.to_string())),
            ("order", self.order.map(|v| v.to_string())),
            ("count", self.count.map(|v| v.to_string())),
            ("format", self.format.clone()),
        ];
        fields
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect()
    }
}

pub fn endpoint_url(host: &str, query: &EventQuery) -> String {
    let mut url = format!("{}/api/v1/event/", host.trim_end_matches('/'));
    if let Some(event_id) = &query.event_id {
        url.push_str(event_id);
        url.push('/');
    }
    url
}

/// Turns a raw status/body pair into the parsed JSON body.
pub fn decode_response(status: StatusCode, body: &str) -> Result<Value> {
    if status != StatusCode::OK {
        return Err(CollectorError::Upstream {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }
    serde_json::from_str(body)
        .map_err(|e| CollectorError::ResponseShape(format!("body is not JSON: {}", e)))
}

#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self, query: &EventQuery) -> Result<Value>;
}

pub struct ConnpassClient {
    host: String,
    http: reqwest::Client,
}

impl ConnpassClient {
    pub fn new(host: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { host, http })
    }
}

#[async_trait]
impl EventSource for ConnpassClient {
    async fn fetch_events(&self, query: &EventQuery) -> Result<Value> {
        let url = endpoint_url(&self.host, query);
        let params = query.query_pairs();
        debug!(%url, ?params, "requesting events");

        let response = self.http.get(&url).query(&params).send().await?;
        let status = response.status();
        let text = response.text().await?;
        decode_response(status, &text)
    }
}
