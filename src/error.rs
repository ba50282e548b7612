use chrono::{DateTime, Utc};
use thiserror::Error;

/// Abort-level failures. A bulletin that raises one of these is not a usable
/// instance of the format and yields no record at all.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid LSR body: too few lines ({found}, need {needed})")]
    TooFewLines { found: usize, needed: usize },

    #[error("summary LSR should be skipped")]
    SummaryProduct,

    #[error("invalid LSR body: missing ..REMARKS..")]
    MissingRemarks,

    #[error("unable to parse reported time '{raw}': {source}")]
    ReportTime {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("report time ({reported}) older than threshold ({threshold_min} min) at issuance {issued}")]
    StaleReport {
        reported: DateTime<Utc>,
        issued: DateTime<Utc>,
        threshold_min: i64,
    },

    #[error("unsupported product code: {0}")]
    UnsupportedProduct(String),

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
