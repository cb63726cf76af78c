use thiserror::Error;

/// Failure and informational states of the recommendation pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("Failed to load restaurant data from '{path}': {reason}")]
    DataLoad { path: String, reason: String },

    #[error("Not enough restaurants to build recommendations (need at least 2, have {rows})")]
    InsufficientData { rows: usize },

    #[error("Restaurant '{name}' not found in the current filtered dataset")]
    NotFound { name: String },

    #[error("Vector space was built for a different subset")]
    SubsetMismatch,
}

pub type Result<T> = std::result::Result<T, RecommendError>;

impl RecommendError {
    pub fn data_load(path: impl Into<String>, reason: impl ToString) -> Self {
        RecommendError::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether an interactive session can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RecommendError::InsufficientData { .. } | RecommendError::NotFound { .. }
        )
    }

    /// Short machine-readable tag used in CLI output.
    pub fn status(&self) -> &'static str {
        match self {
            RecommendError::DataLoad { .. } => "data_load_error",
            RecommendError::InsufficientData { .. } => "insufficient_data",
            RecommendError::NotFound { .. } => "not_found",
            RecommendError::SubsetMismatch => "subset_mismatch",
        }
    }

    /// Text for the rendering layer.
    pub fn user_message(&self) -> String {
        match self {
            RecommendError::DataLoad { path, .. } => {
                format!("The restaurant data at '{}' could not be read.", path)
            }
            RecommendError::InsufficientData { .. } => {
                "Not enough restaurants to build recommendations (need at least 2).".to_string()
            }
            RecommendError::NotFound { .. } => {
                "Selected restaurant not found in the current filtered dataset.".to_string()
            }
            RecommendError::SubsetMismatch => {
                "Recommendations are out of date for the current filters.".to_string()
            }
        }
    }
}
