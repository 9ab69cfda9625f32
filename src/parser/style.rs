//! Heading classification from paragraph style names.
//!
//! Deliberately conservative: a paragraph is a heading only when its style id
//! or the style's display name says so. Font size, boldness, and alignment
//! are never considered.

use std::collections::HashMap;

use regex::Regex;

use crate::error::{Error, Result};

/// How a body paragraph is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockClass {
    Paragraph,
    Heading(u8),
}

/// Classifies paragraphs by style reference.
#[derive(Debug, Clone)]
pub struct StyleClassifier {
    short_heading: Regex,
    digits: Regex,
    display_names: HashMap<String, String>,
}

impl StyleClassifier {
    /// Classifier with no style definitions.
    pub fn new() -> Result<Self> {
        Self::with_display_names(HashMap::new())
    }

    /// Classifier that also consults display names (style id to name).
    pub fn with_display_names(display_names: HashMap<String, String>) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| Error::Other(format!("invalid pattern {}: {}", pattern, e)))
        };
        Ok(Self {
            short_heading: compile(r"^h(\d)$")?,
            digits: compile(r"\d+")?,
            display_names,
        })
    }

    /// Classify a paragraph by its style reference.
    ///
    /// The style id is tried first, then its display name.
    pub fn classify(&self, style: Option<&str>) -> BlockClass {
        let Some(style) = style else {
            return BlockClass::Paragraph;
        };
        match self.classify_name(style) {
            BlockClass::Paragraph => self
                .display_names
                .get(style)
                .map(|name| self.classify_name(name))
                .unwrap_or(BlockClass::Paragraph),
            heading => heading,
        }
    }

    fn classify_name(&self, name: &str) -> BlockClass {
        let name = name.to_lowercase();

        if name.contains("heading") {
            return BlockClass::Heading(self.level(&name));
        }
        if let Some(caps) = self.short_heading.captures(&name) {
            let level = caps[1].parse::<u8>().unwrap_or(1);
            return BlockClass::Heading(level.max(1));
        }
        // "subtitle" contains "title"
        if name.contains("subtitle") {
            return BlockClass::Heading(2);
        }
        if name.contains("title") {
            return BlockClass::Heading(1);
        }
        BlockClass::Paragraph
    }

    fn level(&self, name: &str) -> u8 {
        self.digits
            .find(name)
            .and_then(|m| m.as_str().parse::<u8>().ok())
            .unwrap_or(1)
            .max(1)
    }
}
