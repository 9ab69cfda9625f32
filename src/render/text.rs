//! Plain text rendering for extracted elements.

use crate::model::{Element, ElementKind};

/// Text contributed by one element, if any.
///
/// Paragraphs, headings, footnotes, and tables carry text; tables render
/// rows on separate lines with tab-separated cells. Page headers, footers,
/// images, and metadata contribute nothing.
pub fn element_text(element: &Element) -> Option<String> {
    match &element.kind {
        ElementKind::Paragraph(p) => Some(p.text.clone()),
        ElementKind::Header(h) => Some(h.text.clone()),
        ElementKind::Footnote(n) => Some(n.text.clone()),
        ElementKind::Table(t) => Some(t.plain_text()),
        _ => None,
    }
}

/// Convert elements to plain text, one block per line.
pub fn to_text(elements: &[Element]) -> String {
    elements
        .iter()
        .filter_map(element_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ElementId, HeaderFooter, Image, Paragraph, Position, Table, TableRow,
    };

    fn element(id: u64, kind: ElementKind) -> Element {
        Element::new(ElementId::new(id), Position::new(id), kind)
    }

    #[test]
    fn test_to_text() {
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["a", "b"]));
        table.add_row(TableRow::from_strings(["c", "d"]));

        let elements = vec![
            element(1, ElementKind::Paragraph(Paragraph::new("Hello, world!"))),
            element(2, ElementKind::Table(table)),
            element(3, ElementKind::Image(Image::from_part("word/media/x.png", vec![]))),
            element(
                4,
                ElementKind::Footer(HeaderFooter {
                    text: "Page".to_string(),
                    ..Default::default()
                }),
            ),
        ];

        assert_eq!(to_text(&elements), "Hello, world!\na\tb\nc\td");
    }
}
