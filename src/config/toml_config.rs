use crate::adapters::smtp::RelayConfig;
use crate::config::validate_message_settings;
use crate::core::notifier::{DEFAULT_SUBJECT, DEFAULT_TEMPLATE};
use crate::core::{ConfigProvider, Credential, RosterSource};
use crate::utils::error::{NotifyError, Result};
use crate::utils::validation::{self, Validate, SUPPORTED_EXTENSIONS};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub sender: SenderConfig,
    pub input: InputConfig,
    #[serde(default)]
    pub message: MessageConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderConfig {
    pub address: String,
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_template")]
    pub template: String,
    /// 設定後會覆蓋 `template`
    pub template_file: Option<String>,
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            template: default_template(),
            template_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(NotifyError::InvalidConfigValue {
                field: "report.format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: text, json".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置；相對路徑以設定檔所在目錄為基準
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(base) = path.as_ref().parent() {
            config.input.path = resolve(base, &config.input.path);
            if let Some(template_file) = &config.message.template_file {
                config.message.template_file = Some(resolve(base, template_file));
            }
        }

        config.load_template_file()?;
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| NotifyError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${APP_PASSWORD})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NotifyError::Config {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn load_template_file(&mut self) -> Result<()> {
        if let Some(template_file) = &self.message.template_file {
            self.message.template = std::fs::read_to_string(template_file)?;
        }
        Ok(())
    }

    pub fn credential(&self) -> Result<Credential> {
        validation::validate_required_field("sender.credential", &self.sender.credential)
            .map(|secret| Credential::new(secret.clone()))
    }

    pub fn roster_source(&self) -> RosterSource {
        RosterSource::path(PathBuf::from(&self.input.path))
    }

    pub fn report_format(&self) -> ReportFormat {
        self.report.format
    }
}

fn resolve(base: &Path, path: &str) -> String {
    let candidate = Path::new(path);
    if candidate.is_absolute() || base.as_os_str().is_empty() {
        path.to_string()
    } else {
        base.join(candidate).display().to_string()
    }
}

impl ConfigProvider for TomlConfig {
    fn sender_address(&self) -> &str {
        self.sender.address.trim()
    }

    fn subject(&self) -> &str {
        &self.message.subject
    }

    fn template(&self) -> &str {
        &self.message.template
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_message_settings(
            &self.sender.address,
            &self.message.subject,
            &self.message.template,
            &self.relay,
        )?;
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_file_extension("input.path", &self.input.path, SUPPORTED_EXTENSIONS)?;
        Ok(())
    }
}
