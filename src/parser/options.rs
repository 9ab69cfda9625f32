//! Extraction options and configuration.

/// Default image size limit: 10 MiB.
pub const DEFAULT_MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Options controlling one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Emit the document metadata element
    pub include_metadata: bool,

    /// Emit media parts as image elements
    pub include_images: bool,

    /// Emit tables found in the main part
    pub include_tables: bool,

    /// Emit page header parts
    pub include_headers: bool,

    /// Emit page footer parts
    pub include_footers: bool,

    /// Images strictly larger than this are skipped
    pub max_image_size_bytes: usize,

    /// Collapse whitespace runs and trim text
    pub normalize_whitespace: bool,

    /// Attach formatting to paragraphs, headings, and notes
    pub preserve_formatting: bool,

    /// Apply Unicode NFC composition to text
    pub unicode_nfc: bool,

    /// Read media parts on the rayon thread pool
    pub parallel: bool,

    /// First element id of the run
    pub id_start: u64,
}

impl ExtractOptions {
    /// Create new extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the metadata element.
    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    /// Enable or disable table extraction.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Enable or disable page header extraction.
    pub fn with_headers(mut self, include: bool) -> Self {
        self.include_headers = include;
        self
    }

    /// Enable or disable page footer extraction.
    pub fn with_footers(mut self, include: bool) -> Self {
        self.include_footers = include;
        self
    }

    /// Set the image size limit in bytes.
    pub fn with_max_image_size(mut self, bytes: usize) -> Self {
        self.max_image_size_bytes = bytes;
        self
    }

    /// Enable or disable whitespace normalization.
    pub fn with_normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }

    /// Enable or disable formatting output.
    pub fn with_formatting(mut self, preserve: bool) -> Self {
        self.preserve_formatting = preserve;
        self
    }

    /// Enable or disable NFC composition.
    pub fn with_unicode_nfc(mut self, nfc: bool) -> Self {
        self.unicode_nfc = nfc;
        self
    }

    /// Enable or disable parallel image reads.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the first element id.
    pub fn with_id_start(mut self, start: u64) -> Self {
        self.id_start = start;
        self
    }

    /// Text only: no metadata, images, or formatting.
    pub fn text_only(mut self) -> Self {
        self.include_metadata = false;
        self.include_images = false;
        self.preserve_formatting = false;
        self
    }

    /// Everything, including page headers and footers.
    pub fn everything(mut self) -> Self {
        self.include_metadata = true;
        self.include_images = true;
        self.include_tables = true;
        self.include_headers = true;
        self.include_footers = true;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_metadata: true,
            include_images: true,
            include_tables: true,
            include_headers: false,
            include_footers: false,
            max_image_size_bytes: DEFAULT_MAX_IMAGE_SIZE,
            normalize_whitespace: true,
            preserve_formatting: true,
            unicode_nfc: false,
            parallel: false,
            id_start: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert!(options.include_metadata);
        assert!(options.include_images);
        assert!(options.include_tables);
        assert!(!options.include_headers);
        assert!(!options.include_footers);
        assert_eq!(options.max_image_size_bytes, 10 * 1024 * 1024);
        assert!(options.normalize_whitespace);
        assert!(options.preserve_formatting);
        assert!(!options.parallel);
        assert_eq!(options.id_start, 1);
    }

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .with_headers(true)
            .with_tables(false)
            .with_max_image_size(512)
            .with_id_start(100);

        assert!(options.include_headers);
        assert!(!options.include_tables);
        assert_eq!(options.max_image_size_bytes, 512);
        assert_eq!(options.id_start, 100);
    }

    #[test]
    fn test_text_only() {
        let options = ExtractOptions::new().text_only();
        assert!(!options.include_metadata);
        assert!(!options.include_images);
        assert!(!options.preserve_formatting);
        assert!(options.include_tables);
    }

    #[test]
    fn test_everything() {
        let options = ExtractOptions::new().with_images(false).everything();
        assert!(options.include_images);
        assert!(options.include_headers);
        assert!(options.include_footers);
    }
}
