//! Page header and footer content.

use serde::{Deserialize, Serialize};

/// Content of one header or footer part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFooter {
    /// Concatenated text of the part
    pub text: String,

    /// Whether the part contains a PAGE field
    pub has_page_number: bool,

    /// Watermark text, when one of the known watermark shapes is present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<String>,

    /// Part the content came from (e.g. `word/header1.xml`)
    pub part_name: String,
}

impl HeaderFooter {
    /// Whether the part yielded nothing worth reporting.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && !self.has_page_number && self.watermark.is_none()
    }
}
