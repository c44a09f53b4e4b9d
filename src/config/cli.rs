use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "import-fee-calc")]
#[command(about = "Estimate customs duty, VAT and total cost of an imported vehicle")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the catalog endpoint
    #[arg(long)]
    pub catalog_endpoint: Option<String>,

    /// Override the USD to local currency rate
    #[arg(long)]
    pub usd_rate: Option<f64>,

    /// Override the reference resale value (MRP)
    #[arg(long)]
    pub reference_resale_value: Option<f64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Restore a calculation from a page URL and print it
    Hydrate {
        /// Page URL carrying mark, model, volume and year query parameters
        #[arg(long)]
        url: String,

        #[arg(long)]
        json: bool,
    },
    /// Walk the catalog level by level and compute the fees
    Select {
        #[arg(long)]
        mark: String,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        volume: Option<u32>,

        #[arg(long)]
        year: Option<i32>,

        /// Page URL the selection is pushed into
        #[arg(long, default_value = "http://localhost/")]
        page_url: String,

        #[arg(long)]
        json: bool,
    },
    /// Compute fees for a catalog value without contacting the catalog
    Fees {
        /// Catalog value in USD
        #[arg(long)]
        amount: f64,

        #[arg(long)]
        json: bool,
    },
}

impl CliConfig {
    /// 載入設定檔（若有）並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(endpoint) = &self.catalog_endpoint {
            config.catalog.endpoint = endpoint.clone();
        }
        if let Some(rate) = self.usd_rate {
            config.tariff.usd_to_local_rate = Some(rate);
        }
        if let Some(mrp) = self.reference_resale_value {
            config.tariff.reference_resale_value = Some(mrp);
        }

        config.validate()?;
        Ok(config)
    }
}
