use serde::{Deserialize, Serialize};
use std::fmt;

/// Vehicle manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
}

/// Engine displacement offered for a mark and model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(rename = "Value", alias = "value")]
    pub value: u32,
}

/// Reference catalog value (USD) of one model year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    #[serde(rename = "Year", alias = "year")]
    pub year: i32,
    #[serde(rename = "Amount", alias = "amount")]
    pub amount: f64,
}

/// Selection levels in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Mark,
    Model,
    Volume,
    Year,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Mark, Level::Model, Level::Volume, Level::Year];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Query string key of this level.
    pub fn key(self) -> &'static str {
        match self {
            Level::Mark => "mark",
            Level::Model => "model",
            Level::Volume => "volume",
            Level::Year => "year",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Level::ALL.into_iter().find(|level| level.key() == key)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Where the user currently is in the cascade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub mark: Option<String>,
    pub model: Option<String>,
    pub volume: Option<u32>,
    pub year: Option<i32>,
    /// Catalog value of the matched specification. Only set together with `year`.
    pub amount: Option<f64>,
}

impl Selection {
    pub fn is_set(&self, level: Level) -> bool {
        match level {
            Level::Mark => self.mark.is_some(),
            Level::Model => self.model.is_some(),
            Level::Volume => self.volume.is_some(),
            Level::Year => self.year.is_some(),
        }
    }

    /// Number of leading levels that are set, stopping at the first gap.
    pub fn depth(&self) -> usize {
        Level::ALL
            .iter()
            .take_while(|level| self.is_set(**level))
            .count()
    }

    /// True when every level above `level` is chosen.
    pub fn prefix_complete_for(&self, level: Level) -> bool {
        self.depth() >= level.index()
    }

    /// Unsets `level` and every level below it.
    pub fn clear_from(&mut self, level: Level) {
        if level <= Level::Mark {
            self.mark = None;
        }
        if level <= Level::Model {
            self.model = None;
        }
        if level <= Level::Volume {
            self.volume = None;
        }
        self.year = None;
        self.amount = None;
    }

    /// Drops values that sit below an unset level.
    pub fn truncate_at_gap(&mut self) {
        if let Some(gap) = Level::ALL.get(self.depth()).copied() {
            self.clear_from(gap);
        }
    }

    /// Query projection: `(key, value)` for every set level, in cascade order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(mark) = &self.mark {
            pairs.push((Level::Mark.key(), mark.clone()));
        }
        if let Some(model) = &self.model {
            pairs.push((Level::Model.key(), model.clone()));
        }
        if let Some(volume) = self.volume {
            pairs.push((Level::Volume.key(), volume.to_string()));
        }
        if let Some(year) = self.year {
            pairs.push((Level::Year.key(), year.to_string()));
        }
        pairs
    }
}

/// Import fees derived from one catalog value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeResult {
    pub amount_local: f64,
    pub customs_collection_fee: f64,
    pub customs_duty_fee: f64,
    pub vat_fee: f64,
}

impl FeeResult {
    /// Local value plus every fee.
    pub fn total(&self) -> f64 {
        self.amount_local + self.customs_collection_fee + self.customs_duty_fee + self.vat_fee
    }
}

/// Jurisdiction constants the fee chain is computed with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub usd_to_local_rate: f64,
    /// Monthly calculation index (MRP); the collection fee is a multiple of it.
    pub reference_resale_value: f64,
    /// Delivery cost in USD, converted on its own.
    pub delivered_amount: f64,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            usd_to_local_rate: 480.55,
            reference_resale_value: 3692.0,
            delivered_amount: 2100.0,
        }
    }
}

/// A catalog query keyed on a complete prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Marks,
    Models {
        mark: String,
    },
    Volumes {
        mark: String,
        model: String,
    },
    Specifications {
        mark: String,
        model: String,
        volume: u32,
    },
}

impl FetchRequest {
    /// Level whose option list this request fills.
    pub fn level(&self) -> Level {
        match self {
            FetchRequest::Marks => Level::Mark,
            FetchRequest::Models { .. } => Level::Model,
            FetchRequest::Volumes { .. } => Level::Volume,
            FetchRequest::Specifications { .. } => Level::Year,
        }
    }

    /// Builds the request for `level`'s options, or `None` while its prefix is incomplete.
    pub fn for_level(level: Level, selection: &Selection) -> Option<Self> {
        match level {
            Level::Mark => Some(FetchRequest::Marks),
            Level::Model => Some(FetchRequest::Models {
                mark: selection.mark.clone()?,
            }),
            Level::Volume => {
                let mark = selection.mark.clone()?;
                Some(FetchRequest::Volumes {
                    mark,
                    model: selection.model.clone()?,
                })
            }
            Level::Year => {
                let mark = selection.mark.clone()?;
                let model = selection.model.clone()?;
                Some(FetchRequest::Specifications {
                    mark,
                    model,
                    volume: selection.volume?,
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchResponse {
    Marks(Vec<Mark>),
    Models(Vec<Model>),
    Volumes(Vec<Volume>),
    Specifications(Vec<Specification>),
}

impl FetchResponse {
    pub fn level(&self) -> Level {
        match self {
            FetchResponse::Marks(_) => Level::Mark,
            FetchResponse::Models(_) => Level::Model,
            FetchResponse::Volumes(_) => Level::Volume,
            FetchResponse::Specifications(_) => Level::Year,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FetchResponse::Marks(items) => items.len(),
            FetchResponse::Models(items) => items.len(),
            FetchResponse::Volumes(items) => items.len(),
            FetchResponse::Specifications(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Option lists currently loaded for each level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogOptions {
    pub marks: Vec<Mark>,
    pub models: Vec<Model>,
    pub volumes: Vec<Volume>,
    pub specifications: Vec<Specification>,
}

impl CatalogOptions {
    pub fn clear_level(&mut self, level: Level) {
        match level {
            Level::Mark => self.marks.clear(),
            Level::Model => self.models.clear(),
            Level::Volume => self.volumes.clear(),
            Level::Year => self.specifications.clear(),
        }
    }

    pub fn replace(&mut self, response: FetchResponse) {
        match response {
            FetchResponse::Marks(items) => self.marks = items,
            FetchResponse::Models(items) => self.models = items,
            FetchResponse::Volumes(items) => self.volumes = items,
            FetchResponse::Specifications(items) => self.specifications = items,
        }
    }
}
