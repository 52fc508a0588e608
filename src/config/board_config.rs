use crate::core::ConfigProvider;
use crate::domain::model::SeedVariant;
use crate::utils::error::{BoardError, Result};
use crate::utils::validation::{self, Validate};
use crate::view::{DEFAULT_MACHINE_PREFIX, DEFAULT_POOL_LABEL, DEFAULT_TITLE};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENCODING: &str = "Shift_JIS";
pub const DEFAULT_DELIMITER: &str = ",";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub board: BoardSection,
    #[serde(default)]
    pub import: ImportSection,
    #[serde(default)]
    pub labels: LabelSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSection {
    pub title: Option<String>,
    pub seed: Option<SeedVariant>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSection {
    pub encoding: Option<String>,
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelSection {
    pub pool: Option<String>,
    pub machine_prefix: Option<String>,
}

impl BoardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BoardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BOARD_TITLE})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| BoardError::ConfigError {
            message: format!("placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl ConfigProvider for BoardConfig {
    fn title(&self) -> &str {
        self.board.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    fn seed(&self) -> SeedVariant {
        self.board.seed.unwrap_or_default()
    }

    fn encoding_label(&self) -> &str {
        self.import.encoding.as_deref().unwrap_or(DEFAULT_ENCODING)
    }

    fn delimiter(&self) -> &str {
        self.import.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER)
    }

    fn pool_label(&self) -> &str {
        self.labels.pool.as_deref().unwrap_or(DEFAULT_POOL_LABEL)
    }

    fn machine_prefix(&self) -> &str {
        self.labels.machine_prefix.as_deref().unwrap_or(DEFAULT_MACHINE_PREFIX)
    }
}

impl Validate for BoardConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_encoding_label("import.encoding", self.encoding_label())?;
        validation::validate_delimiter("import.delimiter", self.delimiter())?;
        validation::validate_non_empty_string("labels.pool", self.pool_label())?;
        Ok(())
    }
}
