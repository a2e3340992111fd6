//! Markup synthesis for quotes.
//!
//! [`synthesize`] turns a [`estimo_types::QuoteDocument`] into a complete,
//! self-contained HTML page. All quote content passes through
//! [`escape_markup`] on the way in, via the [`Element`] builder.

mod escape;
mod html;
mod node;

pub use escape::escape_markup;
pub use html::synthesize;
pub use node::{Element, Node};

/// A synthesized markup page, built once per render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupDocument {
    html: String,
}

impl MarkupDocument {
    pub fn new(html: String) -> Self {
        Self { html }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.html.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.html.into_bytes()
    }
}
