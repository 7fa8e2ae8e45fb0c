use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("{0} is not set")]
    MissingConfig(String),
    #[error("invalid value for {key}: {value}")]
    InvalidConfig { key: String, value: String },
    #[error("failed to read config file {path}: {reason}")]
    ConfigFile { path: String, reason: String },
    #[error("Error: Received status code {status}\nResponse content: {body}")]
    Upstream { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response shape: {0}")]
    ResponseShape(String),
    #[error("failed to parse updated_at {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, CollectorError>;
