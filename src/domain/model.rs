use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// 名冊中的一位學生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    pub name: String,
    pub email: String,
    /// 空白或非數字的儲存格為 `None`
    pub percentage: Option<f64>,
}

impl RosterRow {
    pub fn new(name: impl Into<String>, email: impl Into<String>, percentage: Option<f64>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            percentage,
        }
    }

    /// 完成度恰好為 0，不做任何容差比較
    pub fn has_zero_completion(&self) -> bool {
        self.percentage == Some(0.0)
    }
}

/// 寄件者的 relay 密碼。`Debug` 不會輸出內容。
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// 移除所有空白字元 (U+0020)
    pub fn normalized(&self) -> String {
        self.0.replace(' ', "")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// 名冊來源：磁碟上的路徑，或上傳的位元組 (附檔名用來判斷格式)
#[derive(Debug, Clone, PartialEq)]
pub enum RosterSource {
    Path(PathBuf),
    Bytes { file_name: String, data: Vec<u8> },
}

impl RosterSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        RosterSource::Path(path.into())
    }

    pub fn bytes(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        RosterSource::Bytes {
            file_name: file_name.into(),
            data,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            RosterSource::Path(path) => path.display().to_string(),
            RosterSource::Bytes { file_name, .. } => file_name.clone(),
        }
    }

    pub fn format(&self) -> SourceFormat {
        match self {
            RosterSource::Path(path) => SourceFormat::from_path(path),
            RosterSource::Bytes { file_name, .. } => SourceFormat::from_path(Path::new(file_name)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => SourceFormat::Csv,
            _ => SourceFormat::Workbook,
        }
    }
}

/// 一封待寄出的信件
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SendOutcome {
    Success,
    Failure(String),
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub selected: usize,
    pub attempted: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl BatchSummary {
    pub fn start(selected: usize) -> Self {
        Self {
            selected,
            attempted: 0,
            success_count: 0,
            error_count: 0,
            cancelled: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record(&mut self, outcome: &SendOutcome) {
        self.attempted += 1;
        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }
}
