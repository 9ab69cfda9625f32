//! Turns analyzed markup into elements.
//!
//! The builder owns the per-run [`IdCounter`], applies text normalization and
//! formatting defaults, and decides heading vs. paragraph from the style
//! classifier. Ordering keys come from a [`BandCursor`] held by each stage.

use unicode_normalization::UnicodeNormalization;

use crate::model::{
    Checkbox, Element, ElementError, ElementId, ElementKind, Footnote, Formatting, Header,
    HeaderFooter, Image, Metadata, Paragraph, Position, Table, TableCell, TableRow,
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE,
};
use crate::parser::{BlockClass, ExtractOptions, MarginScan, NoteEntry, ParagraphScan, StyleClassifier};

/// Hands out element ids for one run.
#[derive(Debug, Clone)]
pub struct IdCounter {
    next: u64,
}

impl IdCounter {
    /// Counter whose first id is `start`.
    pub fn new(start: u64) -> Self {
        Self { next: start }
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> ElementId {
        let id = ElementId::new(self.next);
        self.next += 1;
        id
    }
}

/// Reserved `position.order` range of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Metadata,
    Content,
    Images,
    PageHeaders,
    Footers,
    Footnotes,
}

impl Band {
    /// First order value of the band.
    pub fn start(&self) -> u64 {
        match self {
            Band::Metadata => 0,
            Band::Content => 1,
            Band::Images => 1000,
            Band::PageHeaders => 2000,
            Band::Footers => 3000,
            Band::Footnotes => 4000,
        }
    }

    /// Last order value of the band, `None` for the open-ended last band.
    pub fn last(&self) -> Option<u64> {
        match self {
            Band::Metadata => Some(0),
            Band::Content => Some(999),
            Band::Images => Some(1999),
            Band::PageHeaders => Some(2999),
            Band::Footers => Some(3999),
            Band::Footnotes => None,
        }
    }

    /// A cursor positioned at the start of the band.
    pub fn cursor(self) -> BandCursor {
        BandCursor {
            band: self,
            next: self.start(),
        }
    }
}

/// Next order value within a band.
///
/// Once a stage reaches the last value of its band every further element
/// shares that value; ids still increase, so `(order, id)` keeps emission
/// order without crossing into the next band.
#[derive(Debug, Clone)]
pub struct BandCursor {
    band: Band,
    next: u64,
}

impl BandCursor {
    pub fn band(&self) -> Band {
        self.band
    }

    pub fn next_order(&mut self) -> u64 {
        match self.band.last() {
            Some(last) if self.next > last => last,
            _ => {
                let order = self.next;
                self.next += 1;
                order
            }
        }
    }
}

/// Whitespace and Unicode normalization of extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextNormalizer {
    collapse_whitespace: bool,
    nfc: bool,
}

impl TextNormalizer {
    pub fn new(collapse_whitespace: bool, nfc: bool) -> Self {
        Self {
            collapse_whitespace,
            nfc,
        }
    }

    /// Normalize a piece of text according to the settings.
    pub fn apply(&self, text: &str) -> String {
        let text = if self.nfc {
            text.nfc().collect::<String>()
        } else {
            text.to_string()
        };
        if self.collapse_whitespace {
            collapse_whitespace(&text)
        } else {
            text
        }
    }
}

/// Collapse whitespace runs to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds elements for one extraction run.
#[derive(Debug)]
pub struct ElementBuilder {
    ids: IdCounter,
    normalizer: TextNormalizer,
    preserve_formatting: bool,
    classifier: StyleClassifier,
}

impl ElementBuilder {
    pub fn new(options: &ExtractOptions, classifier: StyleClassifier) -> Self {
        Self {
            ids: IdCounter::new(options.id_start),
            normalizer: TextNormalizer::new(options.normalize_whitespace, options.unicode_nfc),
            preserve_formatting: options.preserve_formatting,
            classifier,
        }
    }

    /// Replace the style classifier (once style names are known).
    pub fn set_classifier(&mut self, classifier: StyleClassifier) {
        self.classifier = classifier;
    }

    /// Wrap a payload into an element with a fresh id.
    pub fn element(&mut self, cursor: &mut BandCursor, kind: ElementKind) -> Element {
        let id = self.ids.next_id();
        Element::new(id, Position::new(cursor.next_order()), kind)
    }

    /// The metadata element, with an optional warning attached.
    pub fn metadata(&mut self, metadata: Metadata, warning: Option<String>) -> Element {
        let mut cursor = Band::Metadata.cursor();
        let element = self.element(&mut cursor, ElementKind::Metadata(metadata));
        match warning {
            Some(message) => element.with_error(ElementError::warning(message)),
            None => element,
        }
    }

    /// Classify and convert a body paragraph. Blank paragraphs yield `None`.
    pub(crate) fn paragraph(&self, scan: ParagraphScan) -> Option<ElementKind> {
        let text = self.normalizer.apply(&scan.text);
        if text.trim().is_empty() {
            return None;
        }

        let formatting = self.formatting(&scan);
        let checkbox = scan.flags.strike.then_some(Checkbox { checked: true });

        let kind = match self.classifier.classify(scan.style.as_deref()) {
            BlockClass::Heading(level) => ElementKind::Header(Header {
                text,
                level: level.max(1),
                formatting,
                checkbox,
                style: scan.style,
                footnote_refs: scan.footnote_refs,
            }),
            BlockClass::Paragraph => ElementKind::Paragraph(Paragraph {
                text,
                formatting,
                checkbox,
                style: scan.style,
                footnote_refs: scan.footnote_refs,
            }),
        };
        Some(kind)
    }

    /// Normalize cell text. Tables whose cells are all blank after
    /// normalization still count; only row-less tables are dropped.
    pub fn table(&self, table: Table) -> Option<ElementKind> {
        if table.is_empty() {
            return None;
        }
        let rows = table
            .rows
            .into_iter()
            .map(|row| {
                TableRow::new(
                    row.cells
                        .into_iter()
                        .map(|cell| TableCell::new(self.normalizer.apply(&cell.text)))
                        .collect(),
                )
            })
            .collect();
        Some(ElementKind::Table(Table { rows }))
    }

    /// Convert a header or footer part. Empty parts yield `None`.
    pub(crate) fn header_footer(
        &self,
        part_name: &str,
        scan: MarginScan,
        footer: bool,
    ) -> Option<ElementKind> {
        if scan.is_empty() {
            return None;
        }
        let content = HeaderFooter {
            text: self.normalizer.apply(&scan.text),
            has_page_number: scan.has_page_number,
            watermark: scan.watermark.map(|w| self.normalizer.apply(&w)),
            part_name: part_name.to_string(),
        };
        Some(if footer {
            ElementKind::Footer(content)
        } else {
            ElementKind::PageHeader(content)
        })
    }

    /// Convert a footnote or endnote.
    pub(crate) fn footnote(&self, note: NoteEntry) -> Option<ElementKind> {
        let text = self.normalizer.apply(&note.text);
        if text.trim().is_empty() {
            return None;
        }
        Some(ElementKind::Footnote(Footnote {
            footnote_id: note.id,
            text,
            formatting: self.formatting(&note.first),
            note_kind: note.kind,
        }))
    }

    /// Wrap a media part.
    pub fn image(&self, part_name: &str, data: Vec<u8>) -> ElementKind {
        ElementKind::Image(Image::from_part(part_name, data))
    }

    fn formatting(&self, scan: &ParagraphScan) -> Option<Formatting> {
        if !self.preserve_formatting {
            return None;
        }
        Some(Formatting {
            bold: scan.flags.bold,
            italic: scan.flags.italic,
            underline: scan.flags.underline,
            strikethrough: scan.flags.strike,
            font_family: scan
                .font_family
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
            font_size: scan.font_size.unwrap_or(DEFAULT_FONT_SIZE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::markup::RunFlags;
    use proptest::prelude::*;

    fn builder(options: &ExtractOptions) -> ElementBuilder {
        ElementBuilder::new(options, StyleClassifier::new().unwrap())
    }

    fn scan(text: &str) -> ParagraphScan {
        let mut scan = ParagraphScan::default();
        scan.text = text.to_string();
        scan
    }

    #[test]
    fn test_id_counter() {
        let mut ids = IdCounter::new(5);
        assert_eq!(ids.next_id().to_string(), "e5");
        assert_eq!(ids.next_id().to_string(), "e6");
    }

    #[test]
    fn test_band_starts() {
        assert_eq!(Band::Metadata.start(), 0);
        assert_eq!(Band::Content.start(), 1);
        assert_eq!(Band::Images.start(), 1000);
        assert_eq!(Band::PageHeaders.start(), 2000);
        assert_eq!(Band::Footers.start(), 3000);
        assert_eq!(Band::Footnotes.start(), 4000);

        let mut cursor = Band::Footers.cursor();
        assert_eq!(cursor.next_order(), 3000);
        assert_eq!(cursor.next_order(), 3001);
        assert_eq!(cursor.band(), Band::Footers);
    }

    #[test]
    fn test_band_cursor_stays_in_band() {
        let mut cursor = Band::Content.cursor();
        let orders: Vec<u64> = (0..1200).map(|_| cursor.next_order()).collect();
        assert_eq!(orders[0], 1);
        assert_eq!(orders[998], 999);
        assert!(orders[999..].iter().all(|&o| o == 999));

        let mut cursor = Band::Metadata.cursor();
        assert_eq!(cursor.next_order(), 0);
        assert_eq!(cursor.next_order(), 0);

        let mut cursor = Band::Footnotes.cursor();
        for _ in 0..5000 {
            cursor.next_order();
        }
        assert_eq!(cursor.next_order(), 9000);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_nfc() {
        let decomposed = "e\u{0301}";
        assert_eq!(TextNormalizer::new(false, true).apply(decomposed), "\u{e9}");
        assert_eq!(TextNormalizer::new(false, false).apply(decomposed), decomposed);
    }

    #[test]
    fn test_raw_whitespace_kept() {
        let options = ExtractOptions::new().with_normalize_whitespace(false);
        let kind = builder(&options).paragraph(scan(" a  b ")).unwrap();
        match kind {
            ElementKind::Paragraph(p) => assert_eq!(p.text, " a  b "),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_blank_paragraph_dropped() {
        let b = builder(&ExtractOptions::default());
        assert!(b.paragraph(scan(" \t\n")).is_none());
    }

    // Heuristic: strikethrough stands in for a ticked checkbox; there is no
    // content-control read.
    #[test]
    fn test_strike_is_checked_checkbox() {
        let b = builder(&ExtractOptions::default());
        let mut s = scan("foo");
        s.flags = RunFlags {
            strike: true,
            ..Default::default()
        };
        match b.paragraph(s).unwrap() {
            ElementKind::Paragraph(p) => {
                assert_eq!(p.text, "foo");
                assert_eq!(p.checkbox, Some(Checkbox { checked: true }));
                assert!(p.formatting.unwrap().strikethrough);
            }
            other => panic!("unexpected {:?}", other),
        }

        match b.paragraph(scan("bar")).unwrap() {
            ElementKind::Paragraph(p) => assert!(p.checkbox.is_none()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_heading_from_style() {
        let b = builder(&ExtractOptions::default());
        let mut s = scan("Intro");
        s.style = Some("Heading2".to_string());
        match b.paragraph(s).unwrap() {
            ElementKind::Header(h) => {
                assert_eq!(h.level, 2);
                assert_eq!(h.style.as_deref(), Some("Heading2"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    // Bold, large text without a heading style stays a paragraph.
    #[test]
    fn test_bold_large_text_is_not_heading() {
        let b = builder(&ExtractOptions::default());
        let mut s = scan("Looks like a heading");
        s.flags.bold = true;
        s.font_size = Some(24.0);
        assert!(matches!(b.paragraph(s), Some(ElementKind::Paragraph(_))));
    }

    #[test]
    fn test_formatting_merge() {
        let b = builder(&ExtractOptions::default());
        let mut s = scan("x");
        s.font_size = Some(14.0);
        let formatting = b.formatting(&s).unwrap();
        assert_eq!(formatting.font_family, "Calibri");
        assert_eq!(formatting.font_size, 14.0);

        let plain = builder(&ExtractOptions::new().with_formatting(false));
        assert!(plain.formatting(&s).is_none());
    }

    #[test]
    fn test_table_cells_normalized() {
        let b = builder(&ExtractOptions::default());
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["  a  b ", "c\nd"]));
        match b.table(table).unwrap() {
            ElementKind::Table(t) => assert_eq!(t.plain_text(), "a b\tc d"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(b.table(Table::new()).is_none());
    }

    #[test]
    fn test_metadata_warning() {
        let mut b = builder(&ExtractOptions::default());
        let element = b.metadata(Metadata::default(), Some("missing".to_string()));
        assert_eq!(element.order(), 0);
        let error = element.error.unwrap();
        assert!(error.recoverable);
        assert_eq!(error.message, "missing");
    }

    proptest! {
        #[test]
        fn prop_collapse_is_idempotent(s in "\\PC*") {
            let once = collapse_whitespace(&s);
            prop_assert_eq!(collapse_whitespace(&once), once.clone());
            prop_assert!(!once.starts_with(char::is_whitespace));
            prop_assert!(!once.ends_with(char::is_whitespace));
        }

        #[test]
        fn prop_ids_strictly_increase(start in 0u64..1_000_000, n in 1usize..200) {
            let mut ids = IdCounter::new(start);
            let mut prev = None;
            for _ in 0..n {
                let id = ids.next_id();
                if let Some(p) = prev {
                    prop_assert!(id > p);
                }
                prev = Some(id);
            }
        }
    }
}
