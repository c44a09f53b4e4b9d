pub mod controller;
pub mod fees;
pub mod report;
pub mod selection;

pub use crate::domain::model::{FeeResult, Selection, Tariff};
pub use crate::domain::ports::{CatalogClient, ConfigProvider};
pub use crate::utils::error::Result;
