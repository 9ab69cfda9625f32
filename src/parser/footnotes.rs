//! Footnote and endnote parts.

use crate::error::Result;
use crate::model::NoteKind;

use super::markup::{walk, MarkupVisitor, ParagraphScan, ParagraphTracker, Routed, Tag};

/// One note with text.
#[derive(Debug, Clone)]
pub(crate) struct NoteEntry {
    /// Numeric id, kept as written
    pub id: String,
    pub kind: NoteKind,
    /// Paragraph texts joined by newlines
    pub text: String,
    /// First non-blank paragraph, for formatting
    pub first: ParagraphScan,
}

/// Analyze a footnotes or endnotes part.
///
/// Entries with a non-numeric id, and entries without text (separators),
/// produce nothing.
pub(crate) fn analyze_notes(part: &str, xml: &str) -> Result<Vec<NoteEntry>> {
    let mut visitor = NoteVisitor::default();
    walk(part, xml, &mut visitor)?;
    Ok(visitor.notes)
}

#[derive(Debug)]
struct OpenNote {
    id: String,
    kind: NoteKind,
    paragraphs: Vec<ParagraphScan>,
}

#[derive(Default)]
struct NoteVisitor {
    tracker: ParagraphTracker,
    current: Option<OpenNote>,
    notes: Vec<NoteEntry>,
}

impl MarkupVisitor for NoteVisitor {
    fn start(&mut self, tag: &Tag<'_>, stack: &[String]) -> Result<()> {
        if self.current.is_none() {
            let kind = match tag.name() {
                "footnote" => NoteKind::Footnote,
                "endnote" => NoteKind::Endnote,
                _ => return Ok(()),
            };
            let id = tag.attr("id").unwrap_or_default();
            if id.trim().parse::<i64>().is_err() {
                log::debug!("Skipping note with non-numeric id {:?}", id);
                return Ok(());
            }
            self.current = Some(OpenNote {
                id: id.trim().to_string(),
                kind,
                paragraphs: Vec::new(),
            });
            return Ok(());
        }

        self.tracker.start(tag, stack);
        Ok(())
    }

    fn text(&mut self, text: &str, _stack: &[String]) {
        self.tracker.text(text);
    }

    fn end(&mut self, name: &str, _stack: &[String]) -> Result<()> {
        if let Routed::Finished(scan) = self.tracker.end(name) {
            if let Some(note) = self.current.as_mut() {
                if !scan.is_blank() {
                    note.paragraphs.push(scan);
                }
            }
            return Ok(());
        }

        if matches!(name, "footnote" | "endnote") {
            if let Some(note) = self.current.take() {
                let text = note
                    .paragraphs
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                if let Some(first) = note.paragraphs.into_iter().next() {
                    self.notes.push(NoteEntry {
                        id: note.id,
                        kind: note.kind,
                        text,
                        first,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footnotes(body: &str) -> String {
        format!(
            r#"<w:footnotes xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{}</w:footnotes>"#,
            body
        )
    }

    #[test]
    fn test_separators_produce_nothing() {
        let xml = footnotes(
            r#"<w:footnote w:type="separator" w:id="-1"><w:p><w:r><w:separator/></w:r></w:p></w:footnote><w:footnote w:type="continuationSeparator" w:id="0"><w:p><w:r><w:continuationSeparator/></w:r></w:p></w:footnote>"#,
        );
        let notes = analyze_notes("word/footnotes.xml", &xml).unwrap();
        assert!(notes.is_empty());
    }

    #[test]
    fn test_id_zero_with_text_is_kept() {
        let xml = footnotes(r#"<w:footnote w:id="0"><w:p><w:r><w:t>Lorem ipsum.</w:t></w:r></w:p></w:footnote>"#);
        let notes = analyze_notes("word/footnotes.xml", &xml).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "0");
        assert_eq!(notes[0].text, "Lorem ipsum.");
        assert_eq!(notes[0].kind, NoteKind::Footnote);
    }

    #[test]
    fn test_multi_paragraph_note_and_formatting() {
        let xml = footnotes(
            r#"<w:footnote w:id="2"><w:p><w:r><w:rPr><w:i/></w:rPr><w:footnoteRef/><w:t>First</w:t></w:r></w:p><w:p><w:r><w:t>Second</w:t></w:r></w:p></w:footnote>"#,
        );
        let notes = analyze_notes("word/footnotes.xml", &xml).unwrap();
        assert_eq!(notes[0].text, "First\nSecond");
        assert!(notes[0].first.flags.italic);
    }

    #[test]
    fn test_non_numeric_id_is_skipped() {
        let xml = footnotes(r#"<w:footnote w:id="x"><w:p><w:r><w:t>Nope</w:t></w:r></w:p></w:footnote>"#);
        assert!(analyze_notes("word/footnotes.xml", &xml).unwrap().is_empty());
    }

    #[test]
    fn test_endnotes() {
        let xml = r#"<w:endnotes xmlns:w="urn:w"><w:endnote w:id="1"><w:p><w:r><w:t>End</w:t></w:r></w:p></w:endnote></w:endnotes>"#;
        let notes = analyze_notes("word/endnotes.xml", xml).unwrap();
        assert_eq!(notes[0].kind, NoteKind::Endnote);
    }
}
