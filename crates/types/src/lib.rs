//! Quote data model shared by every rendering tier.
//!
//! - [`QuoteDocument`], [`LineItem`] and [`EstimateValue`] describe a quote.
//! - [`normalize`] reduces an [`EstimateValue`] to a number or a display string.

pub mod normalize;
pub mod quote;

pub use normalize::{extract_numeric, format_display, format_number, CURRENCY_UNIT, HOURS_UNIT};
pub use quote::{EstimateValue, LineItem, QuoteDocument};
