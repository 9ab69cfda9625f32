//! Tolerant event walk over WordprocessingML parts.
//!
//! Every analyzer in this module tree is a [`MarkupVisitor`] driven by
//! [`walk`]. The walker matches elements by local name, so `w:p` and `p` are
//! the same thing, and keeps its own element stack so that a mismatched end
//! tag can be reported to the visitor and recovered by unwinding instead of
//! aborting the whole part.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

/// A start tag, viewed by local name.
pub(crate) struct Tag<'a> {
    start: &'a BytesStart<'a>,
    name: String,
}

impl<'a> Tag<'a> {
    fn new(start: &'a BytesStart<'a>) -> Self {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        Self { start, name }
    }

    /// Local element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by local name (`w:val` and `val` both match `"val"`).
    pub fn attr(&self, local: &str) -> Option<String> {
        self.start
            .attributes()
            .filter_map(|a| a.ok())
            .find(|a| a.key.local_name().as_ref() == local.as_bytes())
            .map(|a| match a.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
            })
    }

    /// The `val` attribute.
    pub fn val(&self) -> Option<String> {
        self.attr("val")
    }

    /// Whether a toggle property is switched on.
    ///
    /// `<w:b/>` is on; `<w:b w:val="0"/>`, `false` and `off` are off.
    pub fn toggle_on(&self) -> bool {
        match self.val() {
            Some(v) => !matches!(v.as_str(), "0" | "false" | "off"),
            None => true,
        }
    }
}

/// Callbacks for [`walk`].
///
/// `stack` holds the local names of the open ancestors of the current node;
/// it never includes the element being started or ended.
pub(crate) trait MarkupVisitor {
    /// An element opened. Empty elements get `start` followed by `end`.
    fn start(&mut self, tag: &Tag<'_>, stack: &[String]) -> Result<()>;

    /// Character data.
    fn text(&mut self, text: &str, stack: &[String]);

    /// An element closed.
    fn end(&mut self, name: &str, stack: &[String]) -> Result<()>;

    /// An end tag did not match the innermost open element, or the part
    /// ended with elements still open (`found` is empty).
    ///
    /// Return `true` to recover by unwinding, `false` to fail the part.
    fn mismatch(&mut self, _open: &str, _found: &str, _stack: &[String]) -> bool {
        false
    }
}

/// Walk `xml`, feeding events to `visitor`.
///
/// `mc:Fallback` subtrees are skipped; the `mc:Choice` branch is walked.
pub(crate) fn walk<V: MarkupVisitor>(part: &str, xml: &str, visitor: &mut V) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    reader.check_end_names(false);

    let mut stack: Vec<String> = Vec::new();
    let mut skip_depth = 0usize;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            Error::markup(part, format!("at byte {}: {}", reader.buffer_position(), e))
        })?;

        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                Event::Eof => return Err(Error::markup(part, "unexpected end of document")),
                _ => {}
            }
            buf.clear();
            continue;
        }

        match event {
            Event::Start(ref e) => {
                let tag = Tag::new(e);
                if tag.name() == "Fallback" {
                    skip_depth = 1;
                } else {
                    visitor.start(&tag, &stack)?;
                    stack.push(tag.name);
                }
            }
            Event::Empty(ref e) => {
                let tag = Tag::new(e);
                if tag.name() != "Fallback" {
                    visitor.start(&tag, &stack)?;
                    visitor.end(tag.name(), &stack)?;
                }
            }
            Event::Text(ref e) => {
                let text = match e.unescape() {
                    Ok(text) => text,
                    Err(_) => String::from_utf8_lossy(e).into_owned().into(),
                };
                visitor.text(&text, &stack);
            }
            Event::CData(ref e) => {
                let text: Cow<'_, str> = String::from_utf8_lossy(e);
                visitor.text(&text, &stack);
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                close(part, &name, &mut stack, visitor)?;
            }
            Event::Eof => {
                if let Some(open) = stack.last() {
                    if !visitor.mismatch(open, "", &stack) {
                        return Err(Error::markup(
                            part,
                            format!("unexpected end of document inside <{}>", open),
                        ));
                    }
                    while let Some(open) = stack.pop() {
                        visitor.end(&open, &stack)?;
                    }
                }
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn close<V: MarkupVisitor>(
    part: &str,
    name: &str,
    stack: &mut Vec<String>,
    visitor: &mut V,
) -> Result<()> {
    if stack.last().map(String::as_str) == Some(name) {
        stack.pop();
        return visitor.end(name, stack);
    }

    let open = stack.last().cloned().unwrap_or_default();
    if !visitor.mismatch(&open, name, stack) {
        return Err(Error::markup(
            part,
            format!("expected </{}>, found </{}>", open, name),
        ));
    }

    // A stray end tag for an element that is not open at all is dropped.
    if !stack.iter().any(|n| n == name) {
        return Ok(());
    }
    while let Some(popped) = stack.pop() {
        visitor.end(&popped, stack)?;
        if popped == name {
            break;
        }
    }
    Ok(())
}

/// Run formatting flags found in a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RunFlags {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
}

/// Everything recovered from one paragraph block.
///
/// Nested paragraphs (text boxes) are merged into the enclosing one.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParagraphScan {
    /// Raw concatenated text
    pub text: String,
    /// Paragraph style reference (`pStyle`)
    pub style: Option<String>,
    pub flags: RunFlags,
    /// First declared font family
    pub font_family: Option<String>,
    /// First declared font size in points
    pub font_size: Option<f32>,
    /// Footnote and endnote reference ids
    pub footnote_refs: Vec<String>,
    /// Field instructions (`instrText`, `fldSimple@instr`)
    pub instructions: Vec<String>,
    depth: usize,
    in_text: bool,
    in_instr: bool,
}

impl ParagraphScan {
    /// Whether the paragraph has no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether any field instruction is a PAGE field.
    pub fn has_page_field(&self) -> bool {
        self.instructions.iter().any(|i| is_page_field(i))
    }

    fn start(&mut self, tag: &Tag<'_>, parent: Option<&str>) {
        let in_rpr = parent == Some("rPr");
        match tag.name() {
            "p" => {
                self.depth += 1;
                if !self.text.is_empty() && !self.text.ends_with('\n') {
                    self.text.push('\n');
                }
            }
            "t" => self.in_text = true,
            "instrText" => {
                self.in_instr = true;
                self.instructions.push(String::new());
            }
            "fldSimple" => {
                if let Some(instr) = tag.attr("instr") {
                    self.instructions.push(instr);
                }
            }
            "tab" if parent == Some("r") => self.text.push('\t'),
            "br" | "cr" if parent == Some("r") => self.text.push('\n'),
            "pStyle" if parent == Some("pPr") => {
                if self.style.is_none() {
                    self.style = tag.val();
                }
            }
            "b" if in_rpr => self.flags.bold |= tag.toggle_on(),
            "i" if in_rpr => self.flags.italic |= tag.toggle_on(),
            "u" if in_rpr => {
                self.flags.underline |= tag.toggle_on() && tag.val().as_deref() != Some("none")
            }
            "strike" | "dstrike" if in_rpr => self.flags.strike |= tag.toggle_on(),
            "rFonts" if in_rpr && self.font_family.is_none() => {
                self.font_family = ["ascii", "hAnsi", "cs", "eastAsia"]
                    .iter()
                    .find_map(|key| tag.attr(key));
            }
            "sz" if in_rpr && self.font_size.is_none() => {
                self.font_size = tag
                    .val()
                    .and_then(|v| v.parse::<f32>().ok())
                    .map(|half_points| half_points / 2.0);
            }
            "footnoteReference" | "endnoteReference" => {
                if let Some(id) = tag.attr("id") {
                    self.footnote_refs.push(id);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text {
            self.text.push_str(text);
        } else if self.in_instr {
            if let Some(last) = self.instructions.last_mut() {
                last.push_str(text);
            }
        }
    }

    fn end(&mut self, name: &str) {
        match name {
            "p" => self.depth = self.depth.saturating_sub(1),
            "t" => self.in_text = false,
            "instrText" => self.in_instr = false,
            _ => {}
        }
    }
}

/// Whether a field instruction's first word is `PAGE`.
pub(crate) fn is_page_field(instruction: &str) -> bool {
    instruction
        .split_whitespace()
        .next()
        .map(|word| word.eq_ignore_ascii_case("PAGE"))
        .unwrap_or(false)
}

/// What happened to an event offered to a [`ParagraphTracker`].
pub(crate) enum Routed {
    /// No paragraph is open and the event did not open one
    Ignored,
    /// The event belongs to the open paragraph
    Consumed,
    /// The outermost paragraph closed
    Finished(ParagraphScan),
}

/// Routes events into the currently open paragraph, if any.
#[derive(Debug, Default)]
pub(crate) struct ParagraphTracker {
    current: Option<ParagraphScan>,
}

impl ParagraphTracker {
    /// Whether a paragraph is open.
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn start(&mut self, tag: &Tag<'_>, stack: &[String]) -> Routed {
        match self.current.as_mut() {
            Some(scan) => {
                scan.start(tag, stack.last().map(String::as_str));
                Routed::Consumed
            }
            None if tag.name() == "p" => {
                self.current = Some(ParagraphScan::default());
                Routed::Consumed
            }
            None => Routed::Ignored,
        }
    }

    pub fn text(&mut self, text: &str) {
        if let Some(scan) = self.current.as_mut() {
            scan.text(text);
        }
    }

    pub fn end(&mut self, name: &str) -> Routed {
        let Some(scan) = self.current.as_mut() else {
            return Routed::Ignored;
        };
        if name == "p" && scan.depth == 0 {
            return match self.current.take() {
                Some(scan) => Routed::Finished(scan),
                None => Routed::Ignored,
            };
        }
        scan.end(name);
        Routed::Consumed
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Collects top-level paragraphs of a fragment.
    #[derive(Default)]
    struct Paragraphs {
        tracker: ParagraphTracker,
        found: Vec<ParagraphScan>,
    }

    impl MarkupVisitor for Paragraphs {
        fn start(&mut self, tag: &Tag<'_>, stack: &[String]) -> Result<()> {
            self.tracker.start(tag, stack);
            Ok(())
        }

        fn text(&mut self, text: &str, _stack: &[String]) {
            self.tracker.text(text);
        }

        fn end(&mut self, name: &str, _stack: &[String]) -> Result<()> {
            if let Routed::Finished(scan) = self.tracker.end(name) {
                self.found.push(scan);
            }
            Ok(())
        }
    }

    pub(crate) fn doc(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    fn scan(body: &str) -> Vec<ParagraphScan> {
        let mut visitor = Paragraphs::default();
        walk("word/document.xml", &doc(body), &mut visitor).unwrap();
        visitor.found
    }

    #[test]
    fn test_run_text_tabs_and_breaks() {
        let found = scan(
            r#"<w:p><w:r><w:t>Hello</w:t><w:tab/><w:t xml:space="preserve">wide </w:t><w:br/><w:t>world</w:t></w:r></w:p>"#,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Hello\twide \nworld");
    }

    #[test]
    fn test_tab_stops_are_not_text() {
        let found = scan(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        assert_eq!(found[0].text, "x");
    }

    #[test]
    fn test_formatting_flags() {
        let found = scan(
            r#"<w:p><w:r><w:rPr><w:b/><w:i w:val="0"/><w:u w:val="single"/><w:rFonts w:ascii="Arial"/><w:sz w:val="28"/></w:rPr><w:t>x</w:t></w:r></w:p>"#,
        );
        let flags = found[0].flags;
        assert!(flags.bold);
        assert!(!flags.italic);
        assert!(flags.underline);
        assert!(!flags.strike);
        assert_eq!(found[0].font_family.as_deref(), Some("Arial"));
        assert_eq!(found[0].font_size, Some(14.0));
    }

    #[test]
    fn test_underline_none_and_dstrike() {
        let found = scan(
            r#"<w:p><w:r><w:rPr><w:u w:val="none"/><w:dstrike/></w:rPr><w:t>x</w:t></w:r></w:p>"#,
        );
        assert!(!found[0].flags.underline);
        assert!(found[0].flags.strike);
    }

    #[test]
    fn test_style_and_references() {
        let found = scan(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Intro</w:t></w:r><w:r><w:footnoteReference w:id="3"/></w:r></w:p>"#,
        );
        assert_eq!(found[0].style.as_deref(), Some("Heading2"));
        assert_eq!(found[0].footnote_refs, vec!["3".to_string()]);
    }

    #[test]
    fn test_field_instructions_are_not_text() {
        let found = scan(
            r#"<w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText xml:space="preserve"> PAGE </w:instrText></w:r><w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>2</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#,
        );
        assert_eq!(found[0].text, "2");
        assert!(found[0].has_page_field());
    }

    #[test]
    fn test_page_field_first_word_only() {
        assert!(is_page_field(" PAGE \\* MERGEFORMAT "));
        assert!(!is_page_field("NUMPAGES"));
        assert!(!is_page_field("REF PAGE"));
        assert!(!is_page_field(""));
    }

    #[test]
    fn test_textbox_paragraphs_merge() {
        let found = scan(
            r#"<w:p><w:r><w:t>Outer</w:t><w:pict><w:txbxContent><w:p><w:r><w:t>Inner</w:t></w:r></w:p></w:txbxContent></w:pict></w:r></w:p><w:p><w:r><w:t>Next</w:t></w:r></w:p>"#,
        );
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].text, "Outer\nInner");
        assert_eq!(found[1].text, "Next");
    }

    #[test]
    fn test_fallback_is_skipped() {
        let found = scan(
            r#"<w:p><mc:AlternateContent xmlns:mc="urn:mc"><mc:Choice Requires="wps"><w:t>A</w:t></mc:Choice><mc:Fallback><w:t>A</w:t></mc:Fallback></mc:AlternateContent></w:p>"#,
        );
        assert_eq!(found[0].text, "A");
    }

    #[test]
    fn test_entities_are_unescaped() {
        let found = scan(r#"<w:p><w:r><w:t>Fish &amp; Chips</w:t></w:r></w:p>"#);
        assert_eq!(found[0].text, "Fish & Chips");
    }

    #[test]
    fn test_mismatch_is_fatal_by_default() {
        let mut visitor = Paragraphs::default();
        let result = walk("word/document.xml", &doc("<w:p><w:r></w:p>"), &mut visitor);
        assert!(matches!(result, Err(Error::Markup { .. })));
    }

    #[test]
    fn test_unclosed_document_is_fatal() {
        let mut visitor = Paragraphs::default();
        let result = walk("word/document.xml", "<w:document><w:body>", &mut visitor);
        assert!(result.is_err());
    }
}
