//! Paragraph-level types: body paragraphs, headings, and notes.

use serde::{Deserialize, Serialize};

/// Font family applied when a paragraph declares none.
pub const DEFAULT_FONT_FAMILY: &str = "Calibri";

/// Font size in points applied when a paragraph declares none.
pub const DEFAULT_FONT_SIZE: f32 = 11.0;

/// A body paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph text
    pub text: String,

    /// Formatting flags merged over the defaults (absent when formatting is
    /// not preserved)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting: Option<Formatting>,

    /// Checkbox state inferred from strikethrough
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox: Option<Checkbox>,

    /// Raw style reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Ids of footnotes and endnotes referenced from this paragraph
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footnote_refs: Vec<String>,
}

impl Paragraph {
    /// Create a paragraph with plain text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            formatting: None,
            checkbox: None,
            style: None,
            footnote_refs: Vec::new(),
        }
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether this paragraph is a checked checkbox item.
    pub fn is_checked(&self) -> bool {
        self.checkbox.map(|c| c.checked).unwrap_or(false)
    }
}

/// A heading, classified from its style name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Heading text
    pub text: String,

    /// Heading level (1 = top)
    pub level: u8,

    /// Formatting flags merged over the defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting: Option<Formatting>,

    /// Checkbox state inferred from strikethrough
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox: Option<Checkbox>,

    /// Raw style reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Ids of footnotes and endnotes referenced from this heading
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footnote_refs: Vec<String>,
}

impl Header {
    /// Create a heading.
    pub fn new(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            level: level.max(1),
            formatting: None,
            checkbox: None,
            style: None,
            footnote_refs: Vec::new(),
        }
    }
}

/// Which notes part a note came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// `word/footnotes.xml`
    #[default]
    Footnote,
    /// `word/endnotes.xml`
    Endnote,
}

/// A footnote-bearing paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footnote {
    /// Note id as written in the part
    pub footnote_id: String,

    /// Note text
    pub text: String,

    /// Formatting flags merged over the defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting: Option<Formatting>,

    /// Footnote or endnote
    #[serde(default)]
    pub note_kind: NoteKind,
}

impl Footnote {
    /// Create a footnote.
    pub fn new(footnote_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            footnote_id: footnote_id.into(),
            text: text.into(),
            formatting: None,
            note_kind: NoteKind::Footnote,
        }
    }

    /// Always true; lets callers treat notes like tagged paragraphs.
    pub fn is_footnote(&self) -> bool {
        true
    }
}

/// Checkbox state of a list-like paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkbox {
    /// Whether the box is ticked
    pub checked: bool,
}

/// Formatting of a block.
///
/// Flags are block-wide: a flag is set when any run in the block carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formatting {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Strikethrough text
    pub strikethrough: bool,

    /// Font family
    pub font_family: String,

    /// Font size in points
    pub font_size: f32,
}

impl Default for Formatting {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Formatting {
    /// Check if any styling flag is set.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.underline || self.strikethrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_empty() {
        assert!(Paragraph::new("   ").is_empty());
        assert!(!Paragraph::new("x").is_empty());
    }

    #[test]
    fn test_header_level_floor() {
        assert_eq!(Header::new("Title", 0).level, 1);
        assert_eq!(Header::new("Sub", 2).level, 2);
    }

    #[test]
    fn test_formatting_defaults() {
        let formatting = Formatting::default();
        assert!(!formatting.has_styling());
        assert_eq!(formatting.font_family, "Calibri");
        assert_eq!(formatting.font_size, 11.0);
    }

    #[test]
    fn test_checkbox() {
        let mut p = Paragraph::new("foo");
        assert!(!p.is_checked());
        p.checkbox = Some(Checkbox { checked: true });
        assert!(p.is_checked());
    }

    #[test]
    fn test_paragraph_json_omits_empty_fields() {
        let json = serde_json::to_value(Paragraph::new("Hi")).unwrap();
        assert!(json.get("checkbox").is_none());
        assert!(json.get("footnote_refs").is_none());
    }
}
