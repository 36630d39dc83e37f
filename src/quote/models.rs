use serde::{Deserialize, Serialize, Serializer};

use crate::config::QuoteConfig;
use crate::quote::input;

/// Monthly price of local recording, per camera, regardless of catalog
pub const LOCAL_RECORDING_PRICE: f64 = 1.5;
pub const LOCAL_RECORDING_LABEL: &str = "Grabación local";

/// Days in the pricing month used for daily/weekly figures
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Recording selection of a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingChoice {
    /// On-site recording at a fixed price
    Local,
    /// Cloud tier referenced by catalog id
    Catalog(u32),
}

impl Serialize for RecordingChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Local => serializer.serialize_str("local"),
            Self::Catalog(id) => serializer.serialize_u32(*id),
        }
    }
}

/// One camera (or group of identical cameras) in a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraCartItem {
    /// Free text; duplicates are flagged, not prevented
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub nombre: String,
    /// A row sent without a quantity counts as one camera
    #[serde(default = "one", deserialize_with = "input::de_quantity")]
    pub cantidad: u32,
    #[serde(default)]
    pub selected_service_ids: Vec<u32>,
    #[serde(default)]
    pub selected_solution_ids: Vec<String>,
    #[serde(default, deserialize_with = "input::de_recording")]
    pub selected_recording: Option<RecordingChoice>,
}

fn one() -> u32 {
    1
}

impl CameraCartItem {
    /// A fresh row: one camera, local recording, nothing else selected
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nombre: String::new(),
            cantidad: 1,
            selected_service_ids: Vec::new(),
            selected_solution_ids: Vec::new(),
            selected_recording: Some(RecordingChoice::Local),
        }
    }
}

/// Resolved recording selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingInfo {
    pub modalidad: String,
    pub precio_usd: f64,
}

/// The same amount at the three granularities a quote is shown in
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostPeriods {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

impl CostPeriods {
    /// Derive daily and weekly figures independently from a monthly amount
    pub fn from_monthly(monthly: f64) -> Self {
        Self {
            daily: monthly / DAYS_PER_MONTH,
            weekly: monthly * 7.0 / DAYS_PER_MONTH,
            monthly,
        }
    }

    /// Apply `f` to each granularity
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            daily: f(self.daily),
            weekly: f(self.weekly),
            monthly: f(self.monthly),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.daily.is_finite() && self.weekly.is_finite() && self.monthly.is_finite()
    }

    pub fn add(self, other: Self) -> Self {
        Self {
            daily: self.daily + other.daily,
            weekly: self.weekly + other.weekly,
            monthly: self.monthly + other.monthly,
        }
    }
}

/// Base cost of one line item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemCost {
    pub id: String,
    pub nombre: String,
    pub cantidad: u32,
    /// Display names of the analytics services that resolved
    pub services: Vec<String>,
    /// Display names of the solutions that resolved
    pub solutions: Vec<String>,
    pub recording: Option<RecordingInfo>,
    /// Sum of unit monthly prices for one camera
    pub monthly_per_camera: f64,
    /// Per-camera figures multiplied by `cantidad`
    pub base: CostPeriods,
    pub duplicate_id: bool,
}

/// Grand totals; the margin is applied once over the summed base cost
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    pub margin_percent: f64,
    pub cost: CostPeriods,
    pub sale: CostPeriods,
}

/// Totals expressed in the quote currency
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedTotals {
    pub currency: String,
    pub exchange_rate: f64,
    pub cost: CostPeriods,
    pub sale: CostPeriods,
}

/// Everything the presentation layer needs to render a quote
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub lines: Vec<LineItemCost>,
    pub totals: QuoteTotals,
    pub converted: ConvertedTotals,
    /// Normalised ids occurring more than once
    pub duplicate_ids: Vec<String>,
}

/// Quote request as sent by the client or read from a file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub items: Vec<CameraCartItem>,
    /// Global margin; falls back to the configured default when absent
    #[serde(default, deserialize_with = "input::de_number")]
    pub margin_percent: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "input::de_number")]
    pub exchange_rate: Option<f64>,
}

impl QuoteRequest {
    /// Resolve margin, currency and rate: request values win over
    /// `defaults`, and both go through the same normalisation
    pub fn options(&self, defaults: &QuoteConfig) -> QuoteOptions {
        let currency = self
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(&defaults.currency);

        QuoteOptions {
            margin_percent: input::margin_percent(
                self.margin_percent.or(Some(defaults.default_margin_percent)),
            ),
            currency: currency.to_string(),
            exchange_rate: input::exchange_rate(
                self.exchange_rate.or(Some(defaults.exchange_rate)),
            ),
        }
    }
}

/// Options applied on top of the line items
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteOptions {
    pub margin_percent: f64,
    pub currency: String,
    pub exchange_rate: f64,
}

impl Default for QuoteOptions {
    fn default() -> Self {
        Self {
            margin_percent: 0.0,
            currency: "USD".to_string(),
            exchange_rate: 1.0,
        }
    }
}

/// Input of the quick "how much per camera" simulator
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    #[serde(default, deserialize_with = "input::de_quantity")]
    pub num_camaras: u32,
    #[serde(default)]
    pub selected_service_ids: Vec<u32>,
    #[serde(default, deserialize_with = "input::de_recording")]
    pub selected_recording: Option<RecordingChoice>,
}

/// Simulator output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub num_camaras: u32,
    pub recording: Option<RecordingInfo>,
    pub per_camera: CostPeriods,
    pub total: CostPeriods,
}
