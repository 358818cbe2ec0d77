use polars::prelude::PolarsError;

/// Everything that can abort a render pass.
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    #[error("fetching {source_name} failed: {error}")]
    Fetch {
        source_name: String,
        #[source]
        error: reqwest::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("table error: {0}")]
    Polars(#[from] PolarsError),

    #[error("chart error: {0}")]
    Chart(String),

    #[error("page error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl DashError {
    /// Whether the failure came from the upstream data source.
    pub fn is_upstream(&self) -> bool {
        matches!(self, DashError::Fetch { .. })
    }
}

pub type Result<T, E = DashError> = std::result::Result<T, E>;
