use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown text encoding: {label}")]
    UnknownEncoding { label: String },

    #[error("Event script error: {message}")]
    ScriptError { message: String },

    #[error("Import task failed: {0}")]
    ImportTaskError(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BoardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BoardError::ConfigError { .. }
            | BoardError::ConfigValidationError { .. }
            | BoardError::InvalidConfigValueError { .. }
            | BoardError::UnknownEncoding { .. } => ErrorCategory::Configuration,
            BoardError::SerializationError(_) | BoardError::ScriptError { .. } => ErrorCategory::Input,
            BoardError::IoError(_) | BoardError::ImportTaskError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BoardError::IoError(e) => format!("檔案存取失敗: {}", e),
            BoardError::SerializationError(e) => format!("JSON 格式錯誤: {}", e),
            BoardError::ConfigError { message } => format!("設定錯誤: {}", message),
            BoardError::ConfigValidationError { field, message } => {
                format!("設定欄位 {} 有誤: {}", field, message)
            }
            BoardError::InvalidConfigValueError { field, value, reason } => {
                format!("設定欄位 {} 的值 '{}' 無效: {}", field, value, reason)
            }
            BoardError::UnknownEncoding { label } => format!("不支援的文字編碼: {}", label),
            BoardError::ScriptError { message } => format!("事件腳本錯誤: {}", message),
            BoardError::ImportTaskError(e) => format!("CSV 匯入中斷: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BoardError::IoError(_) => "Check that the path exists and is readable/writable",
            BoardError::ImportTaskError(_) => "Retry the import; the background parser stopped unexpectedly",
            BoardError::SerializationError(_) | BoardError::ScriptError { .. } => {
                "Check the event script: it must be a JSON array of board events"
            }
            BoardError::UnknownEncoding { .. } => {
                "Use a WHATWG encoding label such as Shift_JIS, EUC-JP or UTF-8"
            }
            BoardError::ConfigError { .. }
            | BoardError::ConfigValidationError { .. }
            | BoardError::InvalidConfigValueError { .. } => "Review the TOML configuration and CLI flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
