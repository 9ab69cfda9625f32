//! Embedded media.

use serde::{Deserialize, Serialize};

/// An image stored in the package's media folder.
///
/// The format comes from the file extension only; pixel dimensions are not
/// decoded and stay zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Raw binary data
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// Image format inferred from the extension
    pub format: ImageFormat,

    /// MIME type (e.g., "image/jpeg")
    pub mime_type: String,

    /// File name without folders (e.g. `image1.png`)
    pub filename: String,

    /// Full part name in the package
    pub part_name: String,

    /// Width in pixels (not decoded, always 0)
    pub width: u32,

    /// Height in pixels (not decoded, always 0)
    pub height: u32,

    /// Placement information
    pub positioning: Positioning,

    /// Size of the data in bytes
    pub size: usize,
}

impl Image {
    /// Create an image from a media part.
    pub fn from_part(part_name: impl Into<String>, data: Vec<u8>) -> Self {
        let part_name = part_name.into();
        let filename = part_name
            .rsplit('/')
            .next()
            .unwrap_or(part_name.as_str())
            .to_string();
        let format = ImageFormat::from_filename(&filename);
        let size = data.len();

        Self {
            data,
            format,
            mime_type: format.mime_type().to_string(),
            filename,
            part_name,
            width: 0,
            height: 0,
            positioning: Positioning::default(),
            size,
        }
    }

    /// File extension for saving the image.
    pub fn extension(&self) -> &str {
        self.format.extension()
    }
}

/// Placement of an image.
///
/// Anchoring geometry is not parsed, so every image is reported inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Positioning {
    /// Whether the image flows with text
    pub inline: bool,
}

impl Default for Positioning {
    fn default() -> Self {
        Self { inline: true }
    }
}

/// Image format, by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Webp,
    Svg,
    Emf,
    Wmf,
    Unknown,
}

impl ImageFormat {
    /// Infer the format from a file name.
    pub fn from_filename(filename: &str) -> Self {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" | "jpe" => ImageFormat::Jpeg,
            "gif" => ImageFormat::Gif,
            "bmp" | "dib" => ImageFormat::Bmp,
            "tif" | "tiff" => ImageFormat::Tiff,
            "webp" => ImageFormat::Webp,
            "svg" => ImageFormat::Svg,
            "emf" => ImageFormat::Emf,
            "wmf" => ImageFormat::Wmf,
            _ => ImageFormat::Unknown,
        }
    }

    /// MIME type for the format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Tiff => "image/tiff",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Svg => "image/svg+xml",
            ImageFormat::Emf => "image/x-emf",
            ImageFormat::Wmf => "image/x-wmf",
            ImageFormat::Unknown => "application/octet-stream",
        }
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Webp => "webp",
            ImageFormat::Svg => "svg",
            ImageFormat::Emf => "emf",
            ImageFormat::Wmf => "wmf",
            ImageFormat::Unknown => "bin",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
