use crate::utils::error::{GalleryError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub source: SourceConfig,
    pub pagination: PaginationConfig,
    pub detail: DetailConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root of the photo API (`/v2/list` and `/id/{id}/info` hang off it).
    pub api_base: String,
    /// Root used for derived thumbnail and full-size image links.
    pub image_base: String,
    pub page_size: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: "https://picsum.photos".to_string(),
            image_base: "https://picsum.photos".to_string(),
            page_size: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub threshold: f64,
    pub initial_page: u32,
    pub throttle_ms: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        // page 1 is loaded eagerly by the gallery session
        Self {
            threshold: 200.0,
            initial_page: 2,
            throttle_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailConfig {
    pub fallback_page_size: u32,
    pub fallback_max_pages: u32,
    pub early_exit: bool,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            fallback_page_size: 100,
            fallback_max_pages: 50,
            early_exit: true,
        }
    }
}

impl GalleryConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GalleryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GalleryError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PICSUM_API_BASE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GalleryError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.api_base", &self.source.api_base)?;
        validation::validate_url("source.image_base", &self.source.image_base)?;
        validation::validate_range("source.page_size", self.source.page_size, 1, 100)?;

        validation::validate_finite("pagination.threshold", self.pagination.threshold)?;
        validation::validate_positive_number("pagination.threshold", self.pagination.threshold, 0.0)?;
        validation::validate_positive_number(
            "pagination.initial_page",
            self.pagination.initial_page,
            1,
        )?;
        validation::validate_positive_number("pagination.throttle_ms", self.pagination.throttle_ms, 1)?;

        validation::validate_range(
            "detail.fallback_page_size",
            self.detail.fallback_page_size,
            1,
            100,
        )?;
        validation::validate_positive_number(
            "detail.fallback_max_pages",
            self.detail.fallback_max_pages,
            1,
        )?;

        Ok(())
    }
}

impl Validate for GalleryConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
