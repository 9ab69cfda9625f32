//! Rendering options and configuration.

/// Options for rendering elements to Markdown and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix for image paths in output (e.g., "./images/")
    pub image_path_prefix: String,

    /// Maximum heading level (1-6)
    pub max_heading_level: u8,

    /// Include YAML frontmatter with metadata
    pub include_frontmatter: bool,

    /// Render bold/italic/strikethrough markers from block formatting
    pub apply_formatting: bool,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Render page header and footer text
    pub include_page_furniture: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = prefix.into();
        self
    }

    /// Set maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable formatting markers.
    pub fn with_formatting(mut self, apply: bool) -> Self {
        self.apply_formatting = apply;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Enable or disable page header and footer output.
    pub fn with_page_furniture(mut self, include: bool) -> Self {
        self.include_page_furniture = include;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_path_prefix: String::new(),
            max_heading_level: 6,
            include_frontmatter: false,
            apply_formatting: true,
            escape_special_chars: true,
            include_page_furniture: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_image_prefix("./img/")
            .with_max_heading(9)
            .with_frontmatter(true);

        assert_eq!(options.image_path_prefix, "./img/");
        assert_eq!(options.max_heading_level, 6);
        assert!(options.include_frontmatter);
        assert!(options.escape_special_chars);
    }
}
