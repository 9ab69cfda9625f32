//! Element model for extracted DOCX content.
//!
//! Every item the pipeline yields is an [`Element`]: a run-unique id, an
//! ordering [`Position`], an optional recoverable error, and one payload from
//! the closed set in [`ElementKind`].

mod element;
mod header_footer;
mod image;
mod metadata;
mod paragraph;
mod table;

pub use element::{
    Element, ElementError, ElementId, ElementKind, ElementType, Position, Severity,
};
pub use header_footer::HeaderFooter;
pub use image::{Image, ImageFormat, Positioning};
pub use metadata::Metadata;
pub use paragraph::{
    Checkbox, Footnote, Formatting, Header, NoteKind, Paragraph, DEFAULT_FONT_FAMILY,
    DEFAULT_FONT_SIZE,
};
pub use table::{Table, TableCell, TableRow};
