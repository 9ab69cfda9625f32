//! # undocx
//!
//! Streaming structured content extraction from Word (DOCX) documents.
//!
//! A document is opened once and turned into a lazy sequence of typed
//! [`Element`]s: metadata, paragraphs, headings, tables, page headers and
//! footers, footnotes, and embedded images. Every element carries a run-unique
//! id and an ordering position; secondary parts that fail to parse degrade to
//! zero elements instead of aborting the run.
//!
//! ## Quick Start
//!
//! ```no_run
//! use undocx::{extract_file, ExtractOptions};
//!
//! fn main() -> undocx::Result<()> {
//!     for element in extract_file("report.docx", ExtractOptions::default())? {
//!         let element = element?;
//!         if let Some(text) = element.text() {
//!             println!("{}: {}", element.element_type(), text);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Lazy output**: elements are produced on demand, one stage at a time
//! - **Recoverable stages**: broken headers, footers, or notes never abort a run
//! - **Renderers**: plain text, Markdown, JSON and JSON lines
//! - **Parallel image reads**: optional, uses Rayon
//! - **Async input**: `async` feature reads sources with a timeout via Tokio

pub mod builder;
pub mod container;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat};
pub use error::{Error, Result};
pub use model::{
    Checkbox, Element, ElementError, ElementId, ElementKind, ElementType, Footnote, Formatting,
    Header, HeaderFooter, Image, ImageFormat, Metadata, NoteKind, Paragraph, Position, Severity,
    Table, TableCell, TableRow,
};
pub use parser::{ExtractOptions, DEFAULT_MAX_IMAGE_SIZE};
pub use pipeline::{ElementStream, ExtractionReport, Stage, StageOutcome, StageReport};
pub use render::{JsonFormat, RenderOptions};
pub use source::Source;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Start an extraction run over the complete package bytes.
///
/// The container and the main document part are validated here; the returned
/// stream does the rest of the work lazily.
///
/// # Example
///
/// ```no_run
/// use undocx::{extract, ExtractOptions};
///
/// let bytes = std::fs::read("report.docx").unwrap();
/// let stream = extract(bytes, ExtractOptions::new().with_headers(true)).unwrap();
/// for element in stream {
///     println!("{:?}", element.unwrap().element_type());
/// }
/// ```
pub fn extract(bytes: impl Into<Arc<[u8]>>, options: ExtractOptions) -> Result<ElementStream> {
    ElementStream::new(bytes, options)
}

/// Start an extraction run over a file.
pub fn extract_file<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<ElementStream> {
    extract_source(Source::path(path), options)
}

/// Start an extraction run over a reader, drained to the end first.
pub fn extract_reader<R: Read>(reader: R, options: ExtractOptions) -> Result<ElementStream> {
    extract_source(Source::reader(reader), options)
}

/// Start an extraction run over any [`Source`].
pub fn extract_source(source: Source<'_>, options: ExtractOptions) -> Result<ElementStream> {
    let bytes = source.into_bytes()?;
    extract(bytes, options)
}

/// Start an extraction run over an async reader with an optional read timeout.
#[cfg(feature = "async")]
pub async fn extract_async<R>(
    reader: R,
    options: ExtractOptions,
    timeout: Option<std::time::Duration>,
) -> Result<ElementStream>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let bytes = source::read_async(reader, timeout).await?;
    extract(bytes, options)
}

/// Materialize the whole sequence.
///
/// Fails with the stream's error if one occurs; elements produced before the
/// error are discarded.
pub fn collect_all(stream: ElementStream) -> Result<Vec<Element>> {
    stream.collect()
}

/// Concatenate the text of paragraphs, headings, footnotes, and tables.
///
/// # Example
///
/// ```no_run
/// use undocx::{extract_file, extract_text, ExtractOptions};
///
/// let stream = extract_file("report.docx", ExtractOptions::default()).unwrap();
/// println!("{}", extract_text(stream).unwrap());
/// ```
pub fn extract_text(stream: ElementStream) -> Result<String> {
    let mut parts = Vec::new();
    for element in stream {
        if let Some(text) = render::element_text(&element?) {
            if !text.is_empty() {
                parts.push(text);
            }
        }
    }
    Ok(parts.join("\n"))
}

/// Keep only the images.
pub fn extract_images(stream: ElementStream) -> Result<Vec<Image>> {
    let mut images = Vec::new();
    for element in stream {
        if let Some(image) = element?.into_image() {
            images.push(image);
        }
    }
    Ok(images)
}

/// The document metadata, or an empty structure if the run produced none.
pub fn extract_metadata(stream: ElementStream) -> Result<Metadata> {
    for element in stream {
        if let Some(metadata) = element?.into_metadata() {
            return Ok(metadata);
        }
    }
    Ok(Metadata::default())
}

/// Builder for extracting and rendering DOCX documents.
///
/// # Example
///
/// ```no_run
/// use undocx::Undocx;
///
/// let markdown = Undocx::new()
///     .with_headers(true)
///     .with_image_prefix("./images/")
///     .with_frontmatter()
///     .open("report.docx")?
///     .to_markdown()?;
/// # Ok::<(), undocx::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Undocx {
    extract_options: ExtractOptions,
    render_options: RenderOptions,
}

impl Undocx {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text only: no metadata, images, or formatting.
    pub fn text_only(mut self) -> Self {
        self.extract_options = self.extract_options.text_only();
        self
    }

    /// Enable every optional stage.
    pub fn everything(mut self) -> Self {
        self.extract_options = self.extract_options.everything();
        self
    }

    /// Include document metadata.
    pub fn with_metadata(mut self, include: bool) -> Self {
        self.extract_options = self.extract_options.with_metadata(include);
        self
    }

    /// Include images.
    pub fn with_images(mut self, include: bool) -> Self {
        self.extract_options = self.extract_options.with_images(include);
        self
    }

    /// Include tables.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.extract_options = self.extract_options.with_tables(include);
        self
    }

    /// Include page headers.
    pub fn with_headers(mut self, include: bool) -> Self {
        self.extract_options = self.extract_options.with_headers(include);
        self
    }

    /// Include page footers.
    pub fn with_footers(mut self, include: bool) -> Self {
        self.extract_options = self.extract_options.with_footers(include);
        self
    }

    /// Set the largest image to include, in bytes.
    pub fn with_max_image_size(mut self, bytes: usize) -> Self {
        self.extract_options = self.extract_options.with_max_image_size(bytes);
        self
    }

    /// Read images in parallel.
    pub fn parallel(mut self) -> Self {
        self.extract_options = self.extract_options.with_parallel(true);
        self
    }

    /// Keep whitespace as written.
    pub fn raw_whitespace(mut self) -> Self {
        self.extract_options = self.extract_options.with_normalize_whitespace(false);
        self
    }

    /// Set the image path prefix used by the Markdown renderer.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_image_prefix(prefix);
        self
    }

    /// Enable frontmatter in Markdown output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Replace the extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Start a lazy run over bytes.
    pub fn stream(&self, bytes: impl Into<Arc<[u8]>>) -> Result<ElementStream> {
        extract(bytes, self.extract_options.clone())
    }

    /// Extract a file and collect the result.
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<UndocxResult> {
        let bytes = Source::path(path).into_bytes()?;
        self.open_bytes(bytes)
    }

    /// Extract bytes and collect the result.
    pub fn open_bytes(self, bytes: impl Into<Arc<[u8]>>) -> Result<UndocxResult> {
        let (elements, report) = extract(bytes, self.extract_options)?.collect_with_report()?;
        Ok(UndocxResult {
            elements,
            report,
            render_options: self.render_options,
        })
    }
}

/// Collected result of one extraction run.
#[derive(Debug, Clone)]
pub struct UndocxResult {
    /// Extracted elements in production order
    pub elements: Vec<Element>,
    /// Per-stage outcomes
    pub report: ExtractionReport,
    render_options: RenderOptions,
}

impl UndocxResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.elements, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.elements)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.elements, format)
    }

    /// The metadata element's content, if any.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.elements.iter().find_map(|e| e.as_metadata())
    }

    /// All extracted images.
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.elements.iter().filter_map(|e| e.as_image())
    }
}
