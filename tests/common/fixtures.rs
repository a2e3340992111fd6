#![allow(dead_code)]

use estimo::{EstimateValue, LineItem, QuoteDocument};

/// One line item, as in the documented example quote.
pub fn design_quote() -> QuoteDocument {
    QuoteDocument {
        title: "Site".into(),
        description: "Marketing site".into(),
        client_name: "Ada".into(),
        client_email: "ada@example.com".into(),
        line_items: vec![item("Design", EstimateValue::range(10.0, 15.0), EstimateValue::Precise(500.0))],
        total_price: EstimateValue::Precise(500.0),
        total_hours: EstimateValue::range(10.0, 15.0),
        issued_on: None,
    }
}

pub fn item(name: &str, hours: EstimateValue, cost: EstimateValue) -> LineItem {
    LineItem { name: name.into(), description: format!("{name} work"), hours, cost }
}

/// A quote with `count` identical items, long enough to paginate at a few dozen.
pub fn quote_with_items(count: usize) -> QuoteDocument {
    QuoteDocument {
        title: "Platform rebuild".into(),
        description: "Backend and frontend".into(),
        client_name: "Grace".into(),
        client_email: "grace@example.com".into(),
        line_items: (1..=count)
            .map(|i| item(&format!("Module {i}"), EstimateValue::Precise(8.0), EstimateValue::Precise(400.0)))
            .collect(),
        total_price: EstimateValue::Precise(400.0 * count as f64),
        total_hours: EstimateValue::Precise(8.0 * count as f64),
        issued_on: None,
    }
}

/// Every string field carries markup and PDF string delimiters.
pub fn hostile_quote() -> QuoteDocument {
    let hostile = r#"<script>alert("x")</script> (a) \b & 'c'"#;
    QuoteDocument {
        title: hostile.into(),
        description: hostile.into(),
        client_name: hostile.into(),
        client_email: hostile.into(),
        line_items: vec![LineItem {
            name: hostile.into(),
            description: hostile.into(),
            hours: EstimateValue::Preformatted("3-4 hours".into()),
            cost: EstimateValue::Preformatted("€1200".into()),
        }],
        total_price: EstimateValue::Preformatted("n/a".into()),
        total_hours: EstimateValue::Precise(f64::NAN),
        issued_on: None,
    }
}

/// The wire shape produced by the quote service.
pub const QUOTE_JSON: &str = r#"{
    "title": "Web shop",
    "description": "Storefront with checkout",
    "clientName": "Ada Lovelace",
    "clientEmail": "ada@example.com",
    "lineItems": [
        { "name": "Design", "description": "Mockups", "hours": { "min": 10, "max": 15 }, "cost": 500 },
        { "name": "Checkout", "description": "Payments", "hours": "20 hours", "cost": "1200,50 €" }
    ],
    "totalPrice": 1700.5,
    "totalHours": { "min": 30, "max": 35 },
    "issuedOn": "2024-05-02"
}"#;
