use chrono::NaiveDate;
use nanro_client::ApiError;

pub type StatementResult<T> = Result<T, StatementError>;

#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    #[error("Start date {start} is after end date {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Cannot go back {days} days from {end}")]
    OutOfRange { days: u32, end: NaiveDate },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write statement to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
