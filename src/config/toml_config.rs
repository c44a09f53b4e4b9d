use crate::adapters::catalog_http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::core::ConfigProvider;
use crate::domain::model::Tariff;
use crate::utils::currency::DEFAULT_CURRENCY_SUFFIX;
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_CATALOG_ENDPOINT: &str = "http://localhost:8080/transport";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub tariff: TariffConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_CATALOG_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TariffConfig {
    pub usd_to_local_rate: Option<f64>,
    /// 月計算指數 (MRP)
    pub reference_resale_value: Option<f64>,
    pub delivered_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresentationConfig {
    pub currency_suffix: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CalcError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CalcError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("catalog.endpoint", &self.catalog.endpoint)?;

        if self.catalog.timeout_seconds == Some(0) {
            return Err(CalcError::ConfigValidationError {
                field: "catalog.timeout_seconds".to_string(),
                message: "Timeout must be at least one second".to_string(),
            });
        }
        if let Some(user_agent) = &self.catalog.user_agent {
            validation::validate_non_empty_string("catalog.user_agent", user_agent)?;
        }

        let tariff = self.tariff();
        validation::validate_positive_amount("tariff.usd_to_local_rate", tariff.usd_to_local_rate)?;
        validation::validate_positive_amount(
            "tariff.reference_resale_value",
            tariff.reference_resale_value,
        )?;
        validation::validate_non_negative_amount(
            "tariff.delivered_amount",
            tariff.delivered_amount,
        )?;

        validation::validate_non_empty_string(
            "presentation.currency_suffix",
            self.currency_suffix(),
        )?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn catalog_endpoint(&self) -> &str {
        &self.catalog.endpoint
    }

    fn request_timeout(&self) -> Duration {
        self.catalog
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    fn user_agent(&self) -> &str {
        self.catalog.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    fn tariff(&self) -> Tariff {
        let defaults = Tariff::default();
        Tariff {
            usd_to_local_rate: self
                .tariff
                .usd_to_local_rate
                .unwrap_or(defaults.usd_to_local_rate),
            reference_resale_value: self
                .tariff
                .reference_resale_value
                .unwrap_or(defaults.reference_resale_value),
            delivered_amount: self
                .tariff
                .delivered_amount
                .unwrap_or(defaults.delivered_amount),
        }
    }

    fn currency_suffix(&self) -> &str {
        self.presentation
            .currency_suffix
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY_SUFFIX)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
