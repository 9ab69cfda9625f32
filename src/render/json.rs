//! JSON rendering for extracted elements.

use std::io::Write;

use crate::error::{Error, Result};
use crate::model::Element;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert elements to a JSON array.
pub fn to_json(elements: &[Element], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(elements),
        JsonFormat::Compact => serde_json::to_string(elements),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write one compact JSON object per line as elements arrive.
///
/// Stops at the first error from the sequence. Returns the number of lines
/// written.
pub fn write_json_lines<I, W>(elements: I, writer: &mut W) -> Result<usize>
where
    I: IntoIterator<Item = Result<Element>>,
    W: Write,
{
    let mut count = 0;
    for element in elements {
        let element = element?;
        serde_json::to_writer(&mut *writer, &element)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
