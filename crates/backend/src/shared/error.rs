use thiserror::Error;

/// Errors of the sales overview pipeline
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Neither the primary nor the fallback dataset could be opened
    #[error("dataset unavailable: neither {primary} nor {fallback} is readable")]
    DataUnavailable { primary: String, fallback: String },

    /// A row could not be parsed; the whole load is rejected
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    /// The year filter was cleared
    #[error("select at least one year to display data")]
    NoYearsSelected,

    #[error("unknown product category: {0}")]
    UnknownCategory(String),

    #[error("clustering failed: {0}")]
    Clustering(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl DashboardError {
    /// Stable code for API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::DataUnavailable { .. } => "data_unavailable",
            DashboardError::MalformedRow { .. } => "malformed_row",
            DashboardError::NoYearsSelected => "no_years_selected",
            DashboardError::UnknownCategory(_) => "unknown_category",
            DashboardError::Clustering(_) => "clustering_failed",
            DashboardError::Io(_) => "io_error",
            DashboardError::Csv(_) => "csv_error",
        }
    }

    /// Errors the user can fix by changing the dashboard inputs
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DashboardError::NoYearsSelected | DashboardError::UnknownCategory(_)
        )
    }
}
