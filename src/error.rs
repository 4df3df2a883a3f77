use thiserror::Error;

/// Columns every uploaded table must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["id", "heart_rate", "stress", "sleep_hours"];

/// Errors raised while loading, classifying or exporting health data
#[derive(Debug, Error)]
pub enum MonitorError {
    /// One or more required columns are absent from the header row
    #[error("CSV must contain: id, heart_rate, stress, sleep_hours (missing: {})", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A vital-sign cell is empty, non-numeric or not finite
    #[error("row {row}: invalid {column} value {value:?}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// A risk tier outside Low, Moderate and High
    #[error("unknown risk level: {0:?}")]
    UnknownRiskLevel(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
