use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Backend returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    BackendError {
        status: u16,
        message: Option<String>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {message}")]
    InputError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Backend,
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl StoreError {
    /// 後端回傳的 `error` 欄位（若有）
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            StoreError::BackendError { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StoreError::HttpError(_) => ErrorCategory::Network,
            StoreError::BackendError { .. } => ErrorCategory::Backend,
            StoreError::ConfigError { .. }
            | StoreError::ConfigValidationError { .. }
            | StoreError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            StoreError::InputError { .. } => ErrorCategory::Input,
            StoreError::IoError(_) | StoreError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路問題與 5xx 通常重試即可
            StoreError::HttpError(_) => ErrorSeverity::Medium,
            StoreError::BackendError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            StoreError::BackendError { .. } => ErrorSeverity::High,
            StoreError::InputError { .. } => ErrorSeverity::High,
            StoreError::ConfigError { .. }
            | StoreError::ConfigValidationError { .. }
            | StoreError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            StoreError::IoError(_) | StoreError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            StoreError::HttpError(e) if e.is_timeout() => {
                "The inventory backend did not respond in time".to_string()
            }
            StoreError::HttpError(_) => "Could not reach the inventory backend".to_string(),
            StoreError::BackendError {
                message: Some(message),
                ..
            } => message.clone(),
            StoreError::BackendError { status, .. } => {
                format!("The inventory backend rejected the request ({})", status)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the backend is running and --base-url is correct",
            ErrorCategory::Backend => "Check the request fields and the backend logs",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Input => "Check the --field and --file arguments",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
