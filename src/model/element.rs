//! The element envelope shared by every extracted item.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Footnote, Header, HeaderFooter, Image, Metadata, Paragraph, Table};

/// Identifier of an element, unique and increasing within one extraction run.
///
/// Displayed and serialized as `e<n>`; compared numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Create an identifier from its sequence number.
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// The sequence number.
    pub fn seq(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl std::str::FromStr for ElementId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('e')
            .and_then(|n| n.parse().ok())
            .map(ElementId)
            .ok_or_else(|| format!("invalid element id: {}", s))
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Where an element sits in the output ordering.
///
/// `order` is the sort key. `page` and `section` are placeholders; DOCX
/// carries no pagination, so they are constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Page number placeholder (always 1)
    pub page: u32,
    /// Section placeholder (always 0)
    pub section: u32,
    /// Ordering key within one extraction run
    pub order: u64,
}

impl Position {
    /// Create a position with the given order key.
    pub fn new(order: u64) -> Self {
        Self {
            page: 1,
            section: 0,
            order,
        }
    }
}

/// Severity of a problem attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Extraction continued with reduced content
    Warning,
    /// Content for this element could not be recovered
    Error,
}

/// A problem recorded on an element instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementError {
    /// How bad it is
    pub severity: Severity,
    /// Human-readable cause
    pub message: String,
    /// Whether extraction carried on past the problem
    pub recoverable: bool,
}

impl ElementError {
    /// A recoverable warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            recoverable: true,
        }
    }
}

/// Discriminant of an element, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// Document properties
    Metadata,
    /// Body paragraph
    Paragraph,
    /// Style-classified heading
    Header,
    /// Table grid
    Table,
    /// Embedded media
    Image,
    /// Page header part
    PageHeader,
    /// Page footer part
    Footer,
    /// Footnote or endnote
    Footnote,
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementType::Metadata => "metadata",
            ElementType::Paragraph => "paragraph",
            ElementType::Header => "header",
            ElementType::Table => "table",
            ElementType::Image => "image",
            ElementType::PageHeader => "page_header",
            ElementType::Footer => "footer",
            ElementType::Footnote => "footnote",
        };
        f.write_str(name)
    }
}

/// Typed payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    /// Document properties
    Metadata(Metadata),
    /// Body paragraph
    Paragraph(Paragraph),
    /// Heading classified from its style name
    Header(Header),
    /// Table grid
    Table(Table),
    /// Embedded media
    Image(Image),
    /// Content of a page header part
    PageHeader(HeaderFooter),
    /// Content of a page footer part
    Footer(HeaderFooter),
    /// Footnote or endnote body
    Footnote(Footnote),
}

/// One extracted unit of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Run-unique identifier
    pub id: ElementId,

    /// Ordering key
    pub position: Position,

    /// Problem recorded while producing this element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ElementError>,

    /// Typed payload
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create an element.
    pub fn new(id: ElementId, position: Position, kind: ElementKind) -> Self {
        Self {
            id,
            position,
            error: None,
            kind,
        }
    }

    /// Attach an error.
    pub fn with_error(mut self, error: ElementError) -> Self {
        self.error = Some(error);
        self
    }

    /// The element's discriminant.
    pub fn element_type(&self) -> ElementType {
        match &self.kind {
            ElementKind::Metadata(_) => ElementType::Metadata,
            ElementKind::Paragraph(_) => ElementType::Paragraph,
            ElementKind::Header(_) => ElementType::Header,
            ElementKind::Table(_) => ElementType::Table,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::PageHeader(_) => ElementType::PageHeader,
            ElementKind::Footer(_) => ElementType::Footer,
            ElementKind::Footnote(_) => ElementType::Footnote,
        }
    }

    /// Shortcut for `position.order`.
    pub fn order(&self) -> u64 {
        self.position.order
    }

    /// Textual content, if this kind carries any.
    ///
    /// Tables return their rows joined by newlines, cells by tabs.
    pub fn text(&self) -> Option<String> {
        match &self.kind {
            ElementKind::Paragraph(p) => Some(p.text.clone()),
            ElementKind::Header(h) => Some(h.text.clone()),
            ElementKind::Footnote(n) => Some(n.text.clone()),
            ElementKind::Table(t) => Some(t.plain_text()),
            ElementKind::PageHeader(m) | ElementKind::Footer(m) => Some(m.text.clone()),
            ElementKind::Metadata(_) | ElementKind::Image(_) => None,
        }
    }

    /// Whether this element came from the footnotes or endnotes part.
    pub fn is_footnote(&self) -> bool {
        matches!(self.kind, ElementKind::Footnote(_))
    }

    /// Borrow the paragraph payload.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match &self.kind {
            ElementKind::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Borrow the heading payload.
    pub fn as_header(&self) -> Option<&Header> {
        match &self.kind {
            ElementKind::Header(h) => Some(h),
            _ => None,
        }
    }

    /// Borrow the table payload.
    pub fn as_table(&self) -> Option<&Table> {
        match &self.kind {
            ElementKind::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Borrow the image payload.
    pub fn as_image(&self) -> Option<&Image> {
        match &self.kind {
            ElementKind::Image(i) => Some(i),
            _ => None,
        }
    }

    /// Borrow the metadata payload.
    pub fn as_metadata(&self) -> Option<&Metadata> {
        match &self.kind {
            ElementKind::Metadata(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the footnote payload.
    pub fn as_footnote(&self) -> Option<&Footnote> {
        match &self.kind {
            ElementKind::Footnote(n) => Some(n),
            _ => None,
        }
    }

    /// Borrow the page header or footer payload.
    pub fn as_header_footer(&self) -> Option<&HeaderFooter> {
        match &self.kind {
            ElementKind::PageHeader(m) | ElementKind::Footer(m) => Some(m),
            _ => None,
        }
    }

    /// Consume the element, returning the image payload.
    pub fn into_image(self) -> Option<Image> {
        match self.kind {
            ElementKind::Image(i) => Some(i),
            _ => None,
        }
    }

    /// Consume the element, returning the metadata payload.
    pub fn into_metadata(self) -> Option<Metadata> {
        match self.kind {
            ElementKind::Metadata(m) => Some(m),
            _ => None,
        }
    }
}
