//! Byte-level PDF writing without any rendering dependency.
//!
//! This crate produces the small structural subset of PDF needed for
//! text-only documents:
//! - [`ObjectTable`]: an arena of indirect objects that computes stream
//!   lengths, cross-reference offsets and the trailer `/Size` itself
//! - [`ContentStream`]: text positioning and show-text operators
//! - WinAnsi transcoding and literal-string escaping
//!
//! Nothing here returns an error: every operation works on in-memory
//! buffers only.

mod content;
mod encoding;
mod object_table;

pub use content::{escape_literal, literal_string, ContentStream};
pub use encoding::to_win_ansi;
pub use object_table::{Dict, ObjectId, ObjectTable};

/// The leading bytes of every PDF file.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Whether `bytes` starts with [`PDF_MAGIC`].
pub fn has_pdf_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}
