//! Markdown rendering for extracted elements.

use crate::error::Result;
use crate::model::{Checkbox, Element, ElementKind, Formatting, HeaderFooter, Image, Table};

use super::RenderOptions;

/// Convert elements to Markdown.
///
/// Elements are rendered in `position.order`, so a sequence collected from a
/// parallel image read renders the same as a sequential one.
pub fn to_markdown(elements: &[Element], options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(elements)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render elements to Markdown.
    pub fn render(self, elements: &[Element]) -> Result<String> {
        let mut ordered: Vec<&Element> = elements.iter().collect();
        ordered.sort_by_key(|e| (e.order(), e.id));

        let mut output = String::new();

        if self.options.include_frontmatter {
            let metadata = ordered.iter().find_map(|e| e.as_metadata());
            if let Some(metadata) = metadata.filter(|m| !m.is_empty()) {
                output.push_str(&metadata.to_yaml_frontmatter());
                output.push('\n');
            }
        }

        for element in ordered {
            self.render_element(&mut output, element);
        }

        Ok(output.trim().to_string())
    }

    fn render_element(&self, output: &mut String, element: &Element) {
        match &element.kind {
            ElementKind::Metadata(_) => {}
            ElementKind::Paragraph(p) => {
                if p.is_empty() {
                    return;
                }
                self.render_block(
                    output,
                    &p.text,
                    p.formatting.as_ref(),
                    p.checkbox,
                    &p.footnote_refs,
                );
            }
            ElementKind::Header(h) => {
                let level = h.level.clamp(1, self.options.max_heading_level.max(1)) as usize;
                output.push_str(&"#".repeat(level));
                output.push(' ');
                if let Some(checkbox) = h.checkbox {
                    output.push_str(checkbox_mark(checkbox));
                    output.push(' ');
                }
                output.push_str(&self.escape(h.text.trim()));
                push_refs(output, &h.footnote_refs);
                output.push_str("\n\n");
            }
            ElementKind::Table(t) => self.render_table(output, t),
            ElementKind::Image(image) => self.render_image(output, image),
            ElementKind::PageHeader(m) | ElementKind::Footer(m) => {
                if self.options.include_page_furniture {
                    self.render_furniture(output, m);
                }
            }
            ElementKind::Footnote(n) => {
                output.push_str(&format!("[^{}]: {}\n\n", n.footnote_id, self.escape(&n.text)));
            }
        }
    }

    fn render_block(
        &self,
        output: &mut String,
        text: &str,
        formatting: Option<&Formatting>,
        checkbox: Option<Checkbox>,
        refs: &[String],
    ) {
        let escaped = self.escape(text.trim());

        match checkbox {
            Some(checkbox) => {
                output.push_str(&format!("- {} {}", checkbox_mark(checkbox), escaped));
            }
            None => {
                let styled = match formatting {
                    Some(style) if self.options.apply_formatting => {
                        apply_text_style(&escaped, style)
                    }
                    _ => escaped,
                };
                output.push_str(&styled);
            }
        }

        push_refs(output, refs);
        output.push_str("\n\n");
    }

    fn render_table(&self, output: &mut String, table: &Table) {
        let col_count = table.column_count();
        if col_count == 0 {
            return;
        }

        for (i, row) in table.rows.iter().enumerate() {
            output.push('|');
            for col in 0..col_count {
                let content = row
                    .cells
                    .get(col)
                    .map(|c| c.text.replace('\n', " "))
                    .unwrap_or_default();
                let content = if self.options.escape_special_chars {
                    escape_markdown(content.trim())
                } else {
                    content.trim().replace('|', "\\|")
                };
                output.push_str(&format!(" {} |", content));
            }
            output.push('\n');

            // Separator after the first row
            if i == 0 {
                output.push('|');
                output.push_str(&" --- |".repeat(col_count));
                output.push('\n');
            }
        }

        output.push('\n');
    }

    fn render_image(&self, output: &mut String, image: &Image) {
        output.push_str(&format!(
            "![{}]({}{})\n\n",
            image.filename, self.options.image_path_prefix, image.filename
        ));
    }

    fn render_furniture(&self, output: &mut String, margin: &HeaderFooter) {
        if let Some(ref watermark) = margin.watermark {
            output.push_str(&format!("> {}\n\n", self.escape(watermark)));
        }
        for line in margin.text.lines().filter(|l| !l.trim().is_empty()) {
            output.push_str(&format!("> {}\n", self.escape(line.trim())));
        }
        if !margin.text.trim().is_empty() {
            output.push('\n');
        }
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

fn apply_text_style(text: &str, style: &Formatting) -> String {
    let mut result = text.to_string();

    // Innermost first
    if style.strikethrough {
        result = format!("~~{}~~", result);
    }
    if style.italic {
        result = format!("*{}*", result);
    }
    if style.bold {
        result = format!("**{}**", result);
    }
    if style.underline {
        result = format!("<u>{}</u>", result);
    }

    result
}

fn push_refs(output: &mut String, refs: &[String]) {
    for id in refs {
        output.push_str(&format!("[^{}]", id));
    }
}

/// Escape special Markdown characters.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

fn checkbox_mark(checkbox: Checkbox) -> &'static str {
    if checkbox.checked {
        "[x]"
    } else {
        "[ ]"
    }
}
