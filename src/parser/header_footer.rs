//! Header and footer parts: text, page number fields, watermarks.

use crate::error::Result;

use super::markup::{is_page_field, walk, MarkupVisitor, ParagraphTracker, Routed, Tag};

/// Raw content of one header or footer part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MarginScan {
    /// Paragraph texts joined by newlines
    pub text: String,
    pub has_page_number: bool,
    pub watermark: Option<String>,
}

impl MarginScan {
    /// Whether the part holds nothing worth an element.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && !self.has_page_number && self.watermark.is_none()
    }
}

/// Analyze a header or footer part.
pub(crate) fn analyze_header_footer(part: &str, xml: &str) -> Result<MarginScan> {
    let mut visitor = MarginVisitor::default();
    walk(part, xml, &mut visitor)?;

    let mut scan = visitor.scan;
    scan.text = visitor.paragraphs.join("\n");
    Ok(scan)
}

#[derive(Default)]
struct MarginVisitor {
    tracker: ParagraphTracker,
    paragraphs: Vec<String>,
    scan: MarginScan,
    /// Stack depth of the open watermark shape
    watermark_shape: Option<usize>,
}

fn is_watermark_shape(tag: &Tag<'_>) -> bool {
    tag.attr("id")
        .map(|id| id.to_ascii_lowercase().contains("watermark"))
        .unwrap_or(false)
}

impl MarkupVisitor for MarginVisitor {
    fn start(&mut self, tag: &Tag<'_>, stack: &[String]) -> Result<()> {
        match tag.name() {
            "shape" if self.watermark_shape.is_none() && is_watermark_shape(tag) => {
                self.watermark_shape = Some(stack.len());
            }
            // WordArt text watermark
            "textpath" if self.watermark_shape.is_some() => {
                if let Some(text) = tag.attr("string").filter(|s| !s.trim().is_empty()) {
                    self.scan.watermark = Some(text);
                }
            }
            // Picture watermark
            "imagedata" if self.watermark_shape.is_some() && self.scan.watermark.is_none() => {
                if let Some(title) = tag.attr("title").filter(|s| !s.trim().is_empty()) {
                    self.scan.watermark = Some(title);
                }
            }
            _ => {}
        }

        self.tracker.start(tag, stack);
        Ok(())
    }

    fn text(&mut self, text: &str, _stack: &[String]) {
        self.tracker.text(text);
    }

    fn end(&mut self, name: &str, stack: &[String]) -> Result<()> {
        if name == "shape" && self.watermark_shape == Some(stack.len()) {
            self.watermark_shape = None;
        }

        if let Routed::Finished(scan) = self.tracker.end(name) {
            if scan.instructions.iter().any(|i| is_page_field(i)) {
                self.scan.has_page_number = true;
            }
            if !scan.is_blank() {
                self.paragraphs.push(scan.text);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hdr(body: &str) -> String {
        format!(
            r#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:v="urn:schemas-microsoft-com:vml" xmlns:o="urn:schemas-microsoft-com:office:office">{}</w:hdr>"#,
            body
        )
    }

    fn analyze(body: &str) -> MarginScan {
        analyze_header_footer("word/header1.xml", &hdr(body)).unwrap()
    }

    #[test]
    fn test_header_text() {
        let scan = analyze(
            "<w:p><w:r><w:t>Acme Corp</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Confidential</w:t></w:r></w:p>",
        );
        assert_eq!(scan.text, "Acme Corp\nConfidential");
        assert!(!scan.has_page_number);
        assert!(scan.watermark.is_none());
    }

    #[test]
    fn test_page_number_from_complex_field() {
        let scan = analyze(
            r#"<w:p><w:r><w:t xml:space="preserve">Page </w:t></w:r><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText xml:space="preserve"> PAGE   \* MERGEFORMAT </w:instrText></w:r><w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>1</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#,
        );
        assert!(scan.has_page_number);
        assert_eq!(scan.text, "Page 1");
    }

    #[test]
    fn test_page_number_from_simple_field() {
        let scan = analyze(r#"<w:p><w:fldSimple w:instr=" PAGE "><w:r><w:t>3</w:t></w:r></w:fldSimple></w:p>"#);
        assert!(scan.has_page_number);
    }

    #[test]
    fn test_numpages_is_not_page_number() {
        let scan = analyze(r#"<w:p><w:fldSimple w:instr=" NUMPAGES "/></w:p>"#);
        assert!(!scan.has_page_number);
        assert!(scan.is_empty());
    }

    #[test]
    fn test_text_watermark() {
        let scan = analyze(
            r##"<w:p><w:r><w:pict><v:shape id="PowerPlusWaterMarkObject357922611" type="#_x0000_t136"><v:textpath style="font-family:&quot;Calibri&quot;" string="DRAFT"/></v:shape></w:pict></w:r></w:p>"##,
        );
        assert_eq!(scan.watermark.as_deref(), Some("DRAFT"));
        assert!(scan.text.is_empty());
        assert!(!scan.is_empty());
    }

    #[test]
    fn test_picture_watermark() {
        let scan = analyze(
            r##"<w:p><w:r><w:pict><v:shape id="WordPictureWatermark1" type="#_x0000_t75"><v:imagedata r:id="rId1" o:title="logo"/></v:shape></w:pict></w:r></w:p>"##,
        );
        assert_eq!(scan.watermark.as_deref(), Some("logo"));
    }

    #[test]
    fn test_textpath_outside_watermark_shape_is_ignored() {
        let scan = analyze(
            r#"<w:p><w:r><w:pict><v:shape id="_x0000_s1025"><v:textpath string="Fancy"/></v:shape></w:pict></w:r></w:p>"#,
        );
        assert!(scan.watermark.is_none());
        assert!(scan.is_empty());
    }
}
