//! Core properties (`docProps/core.xml`).

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::Metadata;

use super::markup::{walk, MarkupVisitor, Tag};

/// Default location of the core properties part.
pub const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

/// Parse the core properties part.
///
/// Unparseable dates are dropped; malformed markup is an error.
pub(crate) fn parse_core_properties(part: &str, xml: &str) -> Result<Metadata> {
    let mut visitor = CoreVisitor::default();
    walk(part, xml, &mut visitor)?;
    if !visitor.seen_root {
        return Err(Error::markup(part, "missing coreProperties element"));
    }
    Ok(visitor.metadata)
}

/// Office documents use W3CDTF (`2024-01-15T10:30:00Z`).
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Default)]
struct CoreVisitor {
    metadata: Metadata,
    seen_root: bool,
    field: Option<String>,
    value: String,
}

impl MarkupVisitor for CoreVisitor {
    fn start(&mut self, tag: &Tag<'_>, stack: &[String]) -> Result<()> {
        if tag.name() == "coreProperties" && stack.is_empty() {
            self.seen_root = true;
        } else if stack.len() == 1 && self.seen_root {
            self.field = Some(tag.name().to_string());
            self.value.clear();
        }
        Ok(())
    }

    fn text(&mut self, text: &str, _stack: &[String]) {
        if self.field.is_some() {
            self.value.push_str(text);
        }
    }

    fn end(&mut self, name: &str, stack: &[String]) -> Result<()> {
        if stack.len() != 1 {
            return Ok(());
        }
        let Some(field) = self.field.take() else {
            return Ok(());
        };
        if field != name {
            return Ok(());
        }

        let value = self.value.trim();
        if value.is_empty() {
            return Ok(());
        }
        let text = Some(value.to_string());
        let m = &mut self.metadata;
        match field.as_str() {
            "title" => m.title = text,
            "creator" => m.author = text,
            "subject" => m.subject = text,
            "keywords" => m.keywords = text,
            "description" => m.description = text,
            "lastModifiedBy" => m.last_modified_by = text,
            "created" => {
                m.created = parse_datetime(value);
                if m.created.is_none() {
                    log::debug!("Ignoring unparseable created date {:?}", value);
                }
            }
            "modified" => {
                m.modified = parse_datetime(value);
                if m.modified.is_none() {
                    log::debug!("Ignoring unparseable modified date {:?}", value);
                }
            }
            _ => {}
        }
        Ok(())
    }
}
