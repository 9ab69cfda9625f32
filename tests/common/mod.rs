//! Synthetic DOCX packages for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Builds a DOCX package in memory, part by part.
#[derive(Default)]
pub struct DocxBuilder {
    body: Option<String>,
    parts: Vec<(String, Vec<u8>)>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the main document body (the content of `w:body`).
    pub fn body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Append a plain paragraph to the body.
    pub fn paragraph(mut self, text: &str) -> Self {
        let body = self.body.get_or_insert_with(String::new);
        body.push_str(&paragraph(text));
        self
    }

    pub fn core_properties(self, inner: &str) -> Self {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">{}</cp:coreProperties>"#,
            inner
        );
        self.part("docProps/core.xml", xml)
    }

    pub fn styles(self, inner: &str) -> Self {
        let xml = format!(r#"<w:styles xmlns:w="{}">{}</w:styles>"#, W_NS, inner);
        self.part("word/styles.xml", xml)
    }

    pub fn header(self, name: &str, inner: &str) -> Self {
        let xml = format!(r#"<w:hdr xmlns:w="{}">{}</w:hdr>"#, W_NS, inner);
        self.part(name, xml)
    }

    pub fn footer(self, name: &str, inner: &str) -> Self {
        let xml = format!(r#"<w:ftr xmlns:w="{}">{}</w:ftr>"#, W_NS, inner);
        self.part(name, xml)
    }

    pub fn footnotes(self, inner: &str) -> Self {
        let xml = format!(r#"<w:footnotes xmlns:w="{}">{}</w:footnotes>"#, W_NS, inner);
        self.part("word/footnotes.xml", xml)
    }

    pub fn image(self, name: &str, data: Vec<u8>) -> Self {
        self.part(name, data)
    }

    pub fn part(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.parts.push((name.to_string(), data.into()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let mut entries: Vec<(String, Vec<u8>)> = vec![
            ("[Content_Types].xml".to_string(), CONTENT_TYPES.into()),
            ("_rels/.rels".to_string(), PACKAGE_RELS.into()),
        ];
        if let Some(body) = self.body {
            entries.push(("word/document.xml".to_string(), document(&body).into_bytes()));
        }
        entries.extend(self.parts);

        for (name, data) in entries {
            writer.start_file(name, options).unwrap();
            writer.write_all(&data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }
}

pub fn document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
        W_NS, body
    )
}

pub fn paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

pub fn styled_paragraph(style: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
        style, text
    )
}

pub fn table(rows: &[&[&str]]) -> String {
    let mut xml = String::from("<w:tbl>");
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in row.iter() {
            xml.push_str(&format!("<w:tc>{}</w:tc>", paragraph(cell)));
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

/// A package exercising every stage.
pub fn full_document() -> Vec<u8> {
    let body = [
        styled_paragraph("Title", "Quarterly Report"),
        styled_paragraph("Heading1", "Summary"),
        r#"<w:p><w:r><w:t>Revenue grew</w:t></w:r><w:r><w:footnoteReference w:id="1"/></w:r></w:p>"#
            .to_string(),
        table(&[&["Region", "Sales"], &["North", "120"]]),
        r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Bold closing line</w:t></w:r></w:p>"#.to_string(),
    ]
    .concat();

    DocxBuilder::new()
        .body(&body)
        .core_properties(
            "<dc:title>Quarterly Report</dc:title><dc:creator>Finance</dc:creator><dcterms:created xsi:type=\"dcterms:W3CDTF\">2024-01-15T09:30:00Z</dcterms:created>",
        )
        .header("word/header1.xml", &paragraph("ACME Corp"))
        .footer(
            "word/footer1.xml",
            r#"<w:p><w:fldSimple w:instr=" PAGE "><w:r><w:t>1</w:t></w:r></w:fldSimple></w:p>"#,
        )
        .footnotes(
            r#"<w:footnote w:type="separator" w:id="-1"><w:p><w:r><w:separator/></w:r></w:p></w:footnote><w:footnote w:id="1"><w:p><w:r><w:t>Audited figures.</w:t></w:r></w:p></w:footnote>"#,
        )
        .image("word/media/image1.png", vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3])
        .image("word/media/image2.jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0, 9, 9])
        .build()
}
