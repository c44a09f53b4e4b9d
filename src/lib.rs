pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{catalog_http::HttpCatalogClient, query_sync::QuerySync};
pub use config::TomlConfig;
pub use self::core::{
    controller::{HydrateOutcome, SelectionController},
    fees::compute_fees,
    report::QuoteReport,
    selection::{Cascade, CascadeState, Resolution, SelectionEvent},
};
pub use domain::model::{FeeResult, Level, Selection, Specification, Tariff};
pub use utils::currency::{format_currency, CurrencyFormatter};
pub use utils::error::{CalcError, Result};
