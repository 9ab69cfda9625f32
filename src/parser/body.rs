//! Main document part: paragraphs and tables in document order.

use crate::error::Result;
use crate::model::{Table, TableCell, TableRow};

use super::markup::{walk, MarkupVisitor, ParagraphScan, ParagraphTracker, Routed, Tag};

/// A top-level block of the document body.
#[derive(Debug, Clone)]
pub(crate) enum BodyNode {
    Paragraph(ParagraphScan),
    /// Table with raw (unnormalized) cell text
    Table(Table),
}

/// Result of analyzing the main part.
#[derive(Debug, Default)]
pub(crate) struct BodyAnalysis {
    pub nodes: Vec<BodyNode>,
    /// First structural problem found in any table. When set, the table
    /// set as a whole is untrustworthy.
    pub table_error: Option<String>,
}

impl BodyAnalysis {
    /// Number of tables found.
    pub fn table_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, BodyNode::Table(_)))
            .count()
    }
}

/// Analyze the main document part.
///
/// Markup errors outside tables are fatal. Structural problems inside
/// tables are recorded in [`BodyAnalysis::table_error`] instead.
pub(crate) fn analyze_body(part: &str, xml: &str) -> Result<BodyAnalysis> {
    let mut visitor = BodyVisitor::default();
    walk(part, xml, &mut visitor)?;
    Ok(visitor.analysis)
}

#[derive(Debug, Default)]
struct TableState {
    rows: Vec<TableRow>,
    row: Option<Vec<TableCell>>,
    /// Text pieces of the open cell
    cell: Option<Vec<String>>,
}

#[derive(Default)]
struct BodyVisitor {
    tracker: ParagraphTracker,
    tables: Vec<TableState>,
    analysis: BodyAnalysis,
}

impl BodyVisitor {
    fn table_error(&mut self, message: String) {
        if self.analysis.table_error.is_none() {
            log::debug!("Table structure problem: {}", message);
            self.analysis.table_error = Some(message);
        }
    }

    fn finish_paragraph(&mut self, scan: ParagraphScan) {
        match self.tables.last_mut() {
            None => self.analysis.nodes.push(BodyNode::Paragraph(scan)),
            Some(table) => match table.cell.as_mut() {
                Some(cell) => {
                    if !scan.is_blank() {
                        cell.push(scan.text);
                    }
                }
                None => self.table_error("paragraph outside of a table cell".to_string()),
            },
        }
    }

    fn open_row(&mut self) {
        match self.tables.last_mut() {
            None => self.table_error("row outside of a table".to_string()),
            Some(table) if table.row.is_some() => {
                self.table_error("row opened inside another row".to_string())
            }
            Some(table) => table.row = Some(Vec::new()),
        }
    }

    fn open_cell(&mut self) {
        match self.tables.last_mut() {
            Some(table) if table.row.is_some() && table.cell.is_none() => {
                table.cell = Some(Vec::new())
            }
            _ => self.table_error("cell outside of a table row".to_string()),
        }
    }

    fn close_cell(&mut self) {
        if let Some(table) = self.tables.last_mut() {
            if let (Some(pieces), Some(row)) = (table.cell.take(), table.row.as_mut()) {
                row.push(TableCell::new(pieces.join(" ")));
            }
        }
    }

    fn close_row(&mut self) {
        if let Some(table) = self.tables.last_mut() {
            table.cell = None;
            if let Some(cells) = table.row.take() {
                // Rows without cells carry nothing.
                if !cells.is_empty() {
                    table.rows.push(TableRow::new(cells));
                }
            }
        }
    }

    fn close_table(&mut self) {
        let Some(state) = self.tables.pop() else {
            return;
        };
        let table = Table { rows: state.rows };

        match self.tables.last_mut() {
            None => {
                if !table.is_empty() {
                    self.analysis.nodes.push(BodyNode::Table(table));
                }
            }
            // Nested tables contribute their text to the enclosing cell.
            Some(parent) => match parent.cell.as_mut() {
                Some(cell) => {
                    let text = table
                        .cells()
                        .map(|c| c.text.as_str())
                        .filter(|t| !t.trim().is_empty())
                        .collect::<Vec<_>>()
                        .join(" ");
                    if !text.is_empty() {
                        cell.push(text);
                    }
                }
                None => self.table_error("table nested outside of a cell".to_string()),
            },
        }
    }
}

impl MarkupVisitor for BodyVisitor {
    fn start(&mut self, tag: &Tag<'_>, stack: &[String]) -> Result<()> {
        if self.tracker.is_open() {
            self.tracker.start(tag, stack);
            return Ok(());
        }
        match tag.name() {
            "p" => {
                self.tracker.start(tag, stack);
            }
            "tbl" => self.tables.push(TableState::default()),
            "tr" => self.open_row(),
            "tc" => self.open_cell(),
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str, _stack: &[String]) {
        self.tracker.text(text);
    }

    fn end(&mut self, name: &str, _stack: &[String]) -> Result<()> {
        match self.tracker.end(name) {
            Routed::Finished(scan) => self.finish_paragraph(scan),
            Routed::Consumed => {}
            Routed::Ignored => match name {
                "tc" => self.close_cell(),
                "tr" => self.close_row(),
                "tbl" => self.close_table(),
                _ => {}
            },
        }
        Ok(())
    }

    fn mismatch(&mut self, open: &str, found: &str, stack: &[String]) -> bool {
        let in_table = !self.tables.is_empty() || stack.iter().any(|n| n == "tbl");
        if in_table {
            let message = if found.is_empty() {
                format!("table left open at end of document inside <{}>", open)
            } else {
                format!("expected </{}>, found </{}>", open, found)
            };
            self.table_error(message);
        }
        in_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::markup::tests::doc;

    fn analyze(body: &str) -> BodyAnalysis {
        analyze_body("word/document.xml", &doc(body)).unwrap()
    }

    fn para(text: &str) -> String {
        format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text)
    }

    fn texts(analysis: &BodyAnalysis) -> Vec<String> {
        analysis
            .nodes
            .iter()
            .filter_map(|n| match n {
                BodyNode::Paragraph(p) => Some(p.text.clone()),
                BodyNode::Table(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_paragraphs_in_order() {
        let analysis = analyze(&format!("{}{}", para("One"), para("Two")));
        assert_eq!(texts(&analysis), vec!["One", "Two"]);
        assert!(analysis.table_error.is_none());
    }

    #[test]
    fn test_table_grid() {
        let body = format!(
            "{}<w:tbl><w:tblPr/><w:tr><w:tc>{}</w:tc><w:tc>{}{}</w:tc></w:tr><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>{}",
            para("Before"),
            para("A"),
            para("B1"),
            para("B2"),
            para("C"),
            para("After")
        );
        let analysis = analyze(&body);

        assert_eq!(analysis.nodes.len(), 3);
        assert_eq!(analysis.table_count(), 1);
        match &analysis.nodes[1] {
            BodyNode::Table(table) => {
                assert_eq!(table.row_count(), 2);
                assert_eq!(table.rows[0].cells[1].text, "B1 B2");
                assert_eq!(table.rows[1].cells[0].text, "C");
            }
            other => panic!("expected table, got {:?}", other),
        }
        // Cell paragraphs are not body paragraphs.
        assert_eq!(texts(&analysis), vec!["Before", "After"]);
    }

    #[test]
    fn test_nested_table_text_goes_to_cell() {
        let body = format!(
            "<w:tbl><w:tr><w:tc>{}<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl></w:tc></w:tr></w:tbl>",
            para("Outer"),
            para("Inner")
        );
        let analysis = analyze(&body);
        assert_eq!(analysis.table_count(), 1);
        match &analysis.nodes[0] {
            BodyNode::Table(table) => assert_eq!(table.rows[0].cells[0].text, "Outer Inner"),
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_table_without_rows_is_dropped() {
        let analysis = analyze("<w:tbl><w:tblPr/><w:tblGrid/></w:tbl>");
        assert_eq!(analysis.table_count(), 0);
        assert!(analysis.table_error.is_none());
    }

    #[test]
    fn test_cell_outside_row_is_table_error() {
        let body = format!("<w:tbl><w:tc>{}</w:tc></w:tbl>{}", para("x"), para("Body"));
        let analysis = analyze(&body);
        assert!(analysis.table_error.is_some());
        assert_eq!(texts(&analysis), vec!["Body"]);
    }

    #[test]
    fn test_mismatched_end_inside_table_is_recovered() {
        let body = format!(
            "{}<w:tbl><w:tr><w:tc>{}</w:tr></w:tbl>{}",
            para("Before"),
            para("x"),
            para("After")
        );
        let analysis = analyze(&body);
        assert!(analysis.table_error.is_some());
        assert_eq!(texts(&analysis), vec!["Before", "After"]);
    }

    #[test]
    fn test_mismatch_outside_table_is_fatal() {
        let result = analyze_body("word/document.xml", &doc("<w:p><w:r><w:t>x</w:t></w:p>"));
        assert!(result.is_err());
    }

    #[test]
    fn test_row_outside_table_is_table_error() {
        let analysis = analyze("<w:tr><w:tc/></w:tr>");
        assert!(analysis.table_error.is_some());
    }
}
