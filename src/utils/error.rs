use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Invalid App Password: {reason}")]
    CredentialFormat { reason: String },

    #[error("Missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("File not found: {path}")]
    InputNotFound { path: String },

    #[error("Unsupported roster source: {message}")]
    UnsupportedSource { message: String },

    #[error("Workbook contains no worksheets")]
    EmptyWorkbook,

    #[error("Spreadsheet error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("{0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Credential,
    Roster,
    Input,
    Delivery,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl NotifyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NotifyError::CredentialFormat { .. } => ErrorCategory::Credential,
            NotifyError::Schema { .. }
            | NotifyError::EmptyWorkbook
            | NotifyError::Workbook(_)
            | NotifyError::Csv(_) => ErrorCategory::Roster,
            NotifyError::InputNotFound { .. } | NotifyError::UnsupportedSource { .. } => {
                ErrorCategory::Input
            }
            NotifyError::Address(_) | NotifyError::MessageBuild(_) | NotifyError::Transport(_) => {
                ErrorCategory::Delivery
            }
            NotifyError::Config { .. }
            | NotifyError::InvalidConfigValue { .. }
            | NotifyError::MissingConfig { .. } => ErrorCategory::Configuration,
            NotifyError::Io(_) | NotifyError::Serialization(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單筆寄送失敗不會中斷批次
            ErrorCategory::Credential | ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Roster | ErrorCategory::Input | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 依嚴重程度決定的程式結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            NotifyError::CredentialFormat { reason } => format!("Invalid App Password: {}", reason),
            NotifyError::Schema { missing } => {
                format!("Missing required columns: {}", missing.join(", "))
            }
            NotifyError::InputNotFound { .. } => "File not found!".to_string(),
            NotifyError::Transport(e) if e.is_permanent() => {
                format!("The mail relay rejected the request: {}", e)
            }
            NotifyError::Transport(e) => format!("Could not talk to the mail relay: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            NotifyError::CredentialFormat { .. } => {
                "Use a 16-character app password generated for the sender account"
            }
            NotifyError::Schema { .. } => {
                "Make sure the first row of the sheet has 'Name', 'Email' and 'Percentage' headers"
            }
            NotifyError::InputNotFound { .. } => "Check the spreadsheet path and try again",
            NotifyError::UnsupportedSource { .. } => {
                "Provide an .xlsx, .xlsm, .xlsb, .xls, .ods or .csv file"
            }
            NotifyError::EmptyWorkbook | NotifyError::Workbook(_) | NotifyError::Csv(_) => {
                "Open the file in a spreadsheet application and re-save it"
            }
            NotifyError::Address(_) => "Check the email addresses in the sheet and configuration",
            NotifyError::MessageBuild(_) => "Check the subject and template for invalid content",
            NotifyError::Transport(_) => {
                "Verify the relay host/port, network access and that the app password is active"
            }
            NotifyError::Config { .. }
            | NotifyError::InvalidConfigValue { .. }
            | NotifyError::MissingConfig { .. } => "Fix the configuration and run again",
            NotifyError::Io(_) | NotifyError::Serialization(_) => {
                "Check file permissions and available disk space"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
