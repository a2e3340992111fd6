use crate::normalize;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A cost or time figure as it arrives from the quote service.
///
/// Deserialized untagged: a JSON number is `Precise`, an object with `min`
/// and `max` is a `Range`, and any string is kept verbatim as `Preformatted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EstimateValue {
    Precise(f64),
    Range { min: f64, max: f64 },
    /// Free text such as `"20-30h"` or `"1 500 €"`.
    Preformatted(String),
}

impl EstimateValue {
    pub fn range(min: f64, max: f64) -> Self {
        EstimateValue::Range { min, max }
    }

    /// The representative number used wherever a single value is required.
    pub fn numeric(&self) -> f64 {
        normalize::extract_numeric(self)
    }

    /// The human-readable form with `unit` appended.
    pub fn display(&self, unit: &str) -> String {
        normalize::format_display(self, unit)
    }
}

impl Default for EstimateValue {
    fn default() -> Self {
        EstimateValue::Precise(0.0)
    }
}

impl From<f64> for EstimateValue {
    fn from(value: f64) -> Self {
        EstimateValue::Precise(value)
    }
}

impl From<&str> for EstimateValue {
    fn from(value: &str) -> Self {
        EstimateValue::Preformatted(value.to_string())
    }
}

/// One billable piece of work in a quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hours: EstimateValue,
    #[serde(default)]
    pub cost: EstimateValue,
}

/// The complete quote handed to the rendering pipeline.
///
/// The pipeline only ever borrows this value; it never mutates or retains it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub total_price: EstimateValue,
    #[serde(default)]
    pub total_hours: EstimateValue,
    /// Shown in the document header when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
}

impl QuoteDocument {
    /// Sum of the representative cost of every line item.
    pub fn line_item_subtotal(&self) -> f64 {
        self.line_items.iter().map(|item| item.cost.numeric()).sum()
    }
}
