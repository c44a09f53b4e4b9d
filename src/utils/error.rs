use crate::domain::model::Level;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Catalog request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Catalog service returned status {status} for {url}")]
    CatalogStatus { status: u16, url: String },

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Cannot choose {level} before every level above it is chosen")]
    IncompletePrefix { level: Level },

    #[error("Specification {year} ({amount}) is not offered for this selection")]
    UnlistedSpecification { year: i32, amount: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Cascade,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CalcError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CalcError::ApiError(_) | CalcError::CatalogStatus { .. } => ErrorCategory::Network,
            CalcError::UrlError(_)
            | CalcError::ConfigValidationError { .. }
            | CalcError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CalcError::IncompletePrefix { .. } | CalcError::UnlistedSpecification { .. } => {
                ErrorCategory::Cascade
            }
            CalcError::IoError(_) | CalcError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 目錄服務可能只是暫時不可用
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Cascade => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CalcError::ApiError(_) => "Check that the catalog service is reachable and retry",
            CalcError::CatalogStatus { .. } => {
                "Verify the catalog endpoint and the mark/model/volume values you passed"
            }
            CalcError::UrlError(_) => "Pass a full URL including the scheme, e.g. https://host/?mark=...",
            CalcError::ConfigValidationError { .. } | CalcError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or the command line flags"
            }
            CalcError::IncompletePrefix { .. } => {
                "Choose mark, model, volume and year in that order"
            }
            CalcError::UnlistedSpecification { .. } => {
                "Pick one of the years listed for the chosen mark, model and volume"
            }
            CalcError::IoError(_) => "Check the file path and its permissions",
            CalcError::SerializationError(_) => "Report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not load catalog data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Cascade => format!("Invalid selection order: {}", self),
            ErrorCategory::System => format!("Unexpected failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
