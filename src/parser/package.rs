//! Package-level lookups: the main part, part name patterns, style names.

use std::collections::HashMap;

use regex::Regex;

use crate::container::{Part, PartReader};
use crate::error::{Error, Result};

use super::markup::{walk, MarkupVisitor, Tag};

/// Package relationships part.
pub const PACKAGE_RELS_PART: &str = "_rels/.rels";

/// Conventional location of the main document part.
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Style definitions part.
pub const STYLES_PART: &str = "word/styles.xml";

/// Footnotes part.
pub const FOOTNOTES_PART: &str = "word/footnotes.xml";

/// Endnotes part.
pub const ENDNOTES_PART: &str = "word/endnotes.xml";

const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// Compiled part name patterns.
#[derive(Debug, Clone)]
pub struct PartPatterns {
    /// `word/header1.xml`, `word/header2.xml`, ...
    pub headers: Regex,
    /// `word/footer1.xml`, ...
    pub footers: Regex,
    /// Anything under `word/media/`
    pub media: Regex,
}

impl PartPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            headers: compile(r"^word/header\d*\.xml$")?,
            footers: compile(r"^word/footer\d*\.xml$")?,
            media: compile(r"^word/media/[^/]+$")?,
        })
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Other(format!("invalid pattern {}: {}", pattern, e)))
}

/// Locate the main document part.
///
/// Follows the package relationship of type `officeDocument`, falling back to
/// `word/document.xml`. Fails with [`Error::MissingPart`] when neither exists.
pub(crate) fn resolve_main_part<R: PartReader>(reader: &mut R) -> Result<String> {
    match reader.read_part(PACKAGE_RELS_PART)? {
        Some(data) => {
            let part = Part::new(PACKAGE_RELS_PART, data);
            match part.text().and_then(|xml| office_document_target(PACKAGE_RELS_PART, xml)) {
                Ok(Some(target)) if reader.contains(&target) => return Ok(target),
                Ok(Some(target)) => {
                    log::warn!("Main part {} named in package relationships is missing", target)
                }
                Ok(None) => log::debug!("No officeDocument relationship, using default main part"),
                Err(e) => log::warn!("Unreadable package relationships: {}", e),
            }
        }
        None => log::debug!("No package relationships part"),
    }

    if reader.contains(DEFAULT_MAIN_PART) {
        Ok(DEFAULT_MAIN_PART.to_string())
    } else {
        Err(Error::MissingPart(DEFAULT_MAIN_PART.to_string()))
    }
}

/// Target of the `officeDocument` relationship in a `.rels` part.
pub(crate) fn office_document_target(part: &str, xml: &str) -> Result<Option<String>> {
    #[derive(Default)]
    struct Rels {
        target: Option<String>,
    }

    impl MarkupVisitor for Rels {
        fn start(&mut self, tag: &Tag<'_>, _stack: &[String]) -> Result<()> {
            if tag.name() != "Relationship" || self.target.is_some() {
                return Ok(());
            }
            let is_main = tag
                .attr("Type")
                .map(|t| t.ends_with(OFFICE_DOCUMENT_REL))
                .unwrap_or(false);
            if is_main {
                self.target = tag
                    .attr("Target")
                    .map(|t| t.trim_start_matches('/').to_string());
            }
            Ok(())
        }

        fn text(&mut self, _text: &str, _stack: &[String]) {}

        fn end(&mut self, _name: &str, _stack: &[String]) -> Result<()> {
            Ok(())
        }
    }

    let mut rels = Rels::default();
    walk(part, xml, &mut rels)?;
    Ok(rels.target)
}

/// Map of style id to display name from `word/styles.xml`.
pub(crate) fn parse_style_names(part: &str, xml: &str) -> Result<HashMap<String, String>> {
    #[derive(Default)]
    struct Styles {
        current: Option<String>,
        names: HashMap<String, String>,
    }

    impl MarkupVisitor for Styles {
        fn start(&mut self, tag: &Tag<'_>, stack: &[String]) -> Result<()> {
            match tag.name() {
                "style" => self.current = tag.attr("styleId"),
                "name" if stack.last().map(String::as_str) == Some("style") => {
                    if let (Some(id), Some(name)) = (self.current.as_ref(), tag.val()) {
                        self.names.insert(id.clone(), name);
                    }
                }
                _ => {}
            }
            Ok(())
        }

        fn text(&mut self, _text: &str, _stack: &[String]) {}

        fn end(&mut self, name: &str, _stack: &[String]) -> Result<()> {
            if name == "style" {
                self.current = None;
            }
            Ok(())
        }
    }

    let mut styles = Styles::default();
    walk(part, xml, &mut styles)?;
    Ok(styles.names)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/word/main.xml"/>
</Relationships>"#;

    #[test]
    fn test_office_document_target() {
        let target = office_document_target(PACKAGE_RELS_PART, RELS).unwrap();
        assert_eq!(target.as_deref(), Some("word/main.xml"));
    }

    #[test]
    fn test_no_office_document_relationship() {
        let xml = r#"<Relationships><Relationship Id="rId1" Type="x/styles" Target="styles.xml"/></Relationships>"#;
        assert_eq!(office_document_target(PACKAGE_RELS_PART, xml).unwrap(), None);
    }

    #[test]
    fn test_style_names() {
        let xml = r#"<w:styles xmlns:w="urn:w">
            <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/></w:style>
            <w:style w:type="paragraph" w:styleId="a3"><w:name w:val="Title"/></w:style>
            <w:style w:type="paragraph" w:styleId="NoName"/>
        </w:styles>"#;
        let names = parse_style_names(STYLES_PART, xml).unwrap();
        assert_eq!(names.get("Heading1").map(String::as_str), Some("heading 1"));
        assert_eq!(names.get("a3").map(String::as_str), Some("Title"));
        assert!(!names.contains_key("NoName"));
    }

    #[test]
    fn test_part_patterns() {
        let patterns = PartPatterns::new().unwrap();
        assert!(patterns.headers.is_match("word/header1.xml"));
        assert!(patterns.headers.is_match("word/header.xml"));
        assert!(!patterns.headers.is_match("word/_rels/header1.xml.rels"));
        assert!(patterns.footers.is_match("word/footer12.xml"));
        assert!(patterns.media.is_match("word/media/image1.png"));
        assert!(!patterns.media.is_match("word/media/"));
    }
}
