//! Input sources.
//!
//! Extraction always works on a fully materialized buffer. [`Source`] adapts
//! the usual ways of getting one: borrowed or owned bytes, a blocking reader,
//! or a file path. With the `async` feature, [`read_async`] drains a tokio
//! reader under an optional timeout.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::Result;
#[cfg(feature = "async")]
use crate::error::Error;

/// Where the document bytes come from.
pub enum Source<'a> {
    /// Borrowed bytes (copied once)
    Bytes(&'a [u8]),
    /// Owned bytes
    Owned(Vec<u8>),
    /// Any blocking reader, drained to the end
    Reader(Box<dyn Read + 'a>),
    /// A file on disk
    Path(PathBuf),
}

impl<'a> Source<'a> {
    /// Wrap a reader.
    pub fn reader(reader: impl Read + 'a) -> Self {
        Source::Reader(Box::new(reader))
    }

    /// Wrap a file path.
    pub fn path(path: impl AsRef<Path>) -> Self {
        Source::Path(path.as_ref().to_path_buf())
    }

    /// Materialize the source.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Source::Bytes(bytes) => Ok(bytes.to_vec()),
            Source::Owned(bytes) => Ok(bytes),
            Source::Reader(mut reader) => {
                let mut data = Vec::new();
                reader.read_to_end(&mut data)?;
                log::debug!("Read {} bytes from reader", data.len());
                Ok(data)
            }
            Source::Path(path) => {
                let data = std::fs::read(&path)?;
                log::debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(data)
            }
        }
    }
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Bytes(bytes) => write!(f, "Source::Bytes({} bytes)", bytes.len()),
            Source::Owned(bytes) => write!(f, "Source::Owned({} bytes)", bytes.len()),
            Source::Reader(_) => f.write_str("Source::Reader(..)"),
            Source::Path(path) => write!(f, "Source::Path({})", path.display()),
        }
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Source::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Source<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Owned(bytes)
    }
}

impl From<PathBuf> for Source<'_> {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source<'_> {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

/// Drain an async reader, failing with [`Error::Timeout`] if it takes longer
/// than `timeout`.
#[cfg(feature = "async")]
pub async fn read_async<R>(mut reader: R, timeout: Option<std::time::Duration>) -> Result<Vec<u8>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    use tokio::io::AsyncReadExt;

    let mut data = Vec::new();
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, reader.read_to_end(&mut data)).await {
            Ok(result) => {
                result?;
            }
            Err(_) => return Err(Error::Timeout(limit)),
        },
        None => {
            reader.read_to_end(&mut data).await?;
        }
    }
    log::debug!("Read {} bytes from async reader", data.len());
    Ok(data)
}

/// Read a file asynchronously under an optional timeout.
#[cfg(feature = "async")]
pub async fn read_path_async(
    path: impl AsRef<Path>,
    timeout: Option<std::time::Duration>,
) -> Result<Vec<u8>> {
    let file = tokio::fs::File::open(path.as_ref()).await?;
    read_async(file, timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_bytes_and_owned() {
        let data = [1u8, 2, 3];
        assert_eq!(Source::from(&data[..]).into_bytes().unwrap(), vec![1, 2, 3]);
        assert_eq!(Source::from(vec![4u8]).into_bytes().unwrap(), vec![4]);
    }

    #[test]
    fn test_reader() {
        let source = Source::reader(Cursor::new(b"abc".to_vec()));
        assert_eq!(source.into_bytes().unwrap(), b"abc");
    }

    #[test]
    fn test_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"docx bytes").unwrap();
        let source = Source::path(file.path());
        assert_eq!(source.into_bytes().unwrap(), b"docx bytes");
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let source = Source::path("/definitely/not/here.docx");
        assert!(matches!(source.into_bytes(), Err(crate::Error::Io(_))));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_read_async() {
        let data = read_async(&b"async bytes"[..], Some(std::time::Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(data, b"async bytes");
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_read_async_timeout() {
        let (client, _server) = tokio::io::duplex(64);
        let result = read_async(client, Some(std::time::Duration::from_millis(20))).await;
        assert!(matches!(result, Err(Error::Timeout(_))));
    }
}
