use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data integrity error: {message}")]
    DataIntegrityError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Remote,
    Storage,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::UrlError(_) => ErrorCategory::Configuration,
            EtlError::ApiError(_) => ErrorCategory::Remote,
            EtlError::DatabaseError(_) | EtlError::DataIntegrityError { .. } => {
                ErrorCategory::Storage
            }
        }
    }

    /// Process exit code for a run that failed with this error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 1,
            ErrorCategory::Remote => 2,
            ErrorCategory::Storage => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MissingConfigError { field } => {
                format!("Environment variable {} is not set", field)
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Environment variable {} is invalid: {}", field, reason)
            }
            EtlError::ApiError(e) if e.status().is_some() => format!(
                "Game data API returned {}; nothing was saved",
                e.status().map(|s| s.to_string()).unwrap_or_default()
            ),
            EtlError::ApiError(_) => {
                "Could not reach the game data API; nothing was saved".to_string()
            }
            EtlError::DatabaseError(_) | EtlError::DataIntegrityError { .. } => format!(
                "Auction database write failed and was rolled back: {}",
                self
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
