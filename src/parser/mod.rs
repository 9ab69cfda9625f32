//! WordprocessingML markup analysis.

mod body;
mod footnotes;
mod header_footer;
pub(crate) mod markup;
mod metadata;
mod options;
mod package;
mod style;

pub(crate) use body::{analyze_body, BodyAnalysis, BodyNode};
pub(crate) use footnotes::{analyze_notes, NoteEntry};
pub(crate) use header_footer::{analyze_header_footer, MarginScan};
pub(crate) use markup::ParagraphScan;
pub(crate) use metadata::parse_core_properties;
pub use metadata::CORE_PROPERTIES_PART;
pub use options::{ExtractOptions, DEFAULT_MAX_IMAGE_SIZE};
pub(crate) use package::{parse_style_names, resolve_main_part};
pub use package::{
    PartPatterns, DEFAULT_MAIN_PART, ENDNOTES_PART, FOOTNOTES_PART, PACKAGE_RELS_PART, STYLES_PART,
};
pub use style::{BlockClass, StyleClassifier};
