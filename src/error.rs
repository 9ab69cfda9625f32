//! Error types for undocx library.

use std::io;
use thiserror::Error;

/// Result type alias for undocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during DOCX processing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as a ZIP package.
    #[error("Unknown file format: not a valid DOCX package")]
    UnknownFormat,

    /// The container could not be opened or one of its entries is unreadable.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    /// A part required for extraction is missing from the container.
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Markup of a part could not be analyzed.
    #[error("Malformed markup in {part}: {message}")]
    Markup {
        /// Name of the part being analyzed
        part: String,
        /// What went wrong
        message: String,
    },

    /// Reading the input source took longer than allowed.
    #[error("Timed out reading input after {0:?}")]
    Timeout(std::time::Duration),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a markup error for the given part.
    pub fn markup(part: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Markup {
            part: part.into(),
            message: message.into(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::InvalidContainer(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(
            err.to_string(),
            "Unknown file format: not a valid DOCX package"
        );

        let err = Error::markup("word/document.xml", "unexpected end of part");
        assert_eq!(
            err.to_string(),
            "Malformed markup in word/document.xml: unexpected end of part"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_zip_error_conversion() {
        let err: Error = zip::result::ZipError::InvalidArchive("bad magic".into()).into();
        assert!(matches!(err, Error::InvalidContainer(_)));
    }
}
