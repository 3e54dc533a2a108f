use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ChartError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ChartError::InvalidInput(msg.into())
    }

    /// True for errors caused by the request itself rather than a collaborator.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ChartError::InvalidInput(_))
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Serialization(err.to_string())
    }
}
