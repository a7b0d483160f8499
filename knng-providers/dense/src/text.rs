//! Plain-text vector parsing.

use std::io::BufRead;

use crate::{errors::DenseProviderError, ingest::RowBuffer};

/// Parses one vector per line, returning the dimension and the rows.
///
/// Components are separated by commas and/or whitespace. Blank lines are
/// missing vectors; `#` starts a comment line. The first present vector
/// fixes the dimension, and missing rows seen before it are padded once it
/// is known.
pub(crate) fn parse_text_rows(reader: impl BufRead) -> Result<(usize, RowBuffer), DenseProviderError> {
    let mut dimension: Option<usize> = None;
    let mut rows: Vec<Option<Vec<f32>>> = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() {
            rows.push(None);
            continue;
        }
        let values = parse_line(trimmed, line_number)?;
        let expected = *dimension.get_or_insert(values.len());
        if values.len() != expected {
            return Err(DenseProviderError::InconsistentLineDimension {
                line: line_number,
                expected,
                actual: values.len(),
            });
        }
        rows.push(Some(values));
    }

    let dimension = dimension.unwrap_or(0);
    let mut buffer = RowBuffer::default();
    for row in rows {
        match row {
            Some(values) => {
                buffer.values.extend(values);
                buffer.present.push(true);
            }
            None => {
                buffer.values.resize(buffer.values.len() + dimension, 0.0);
                buffer.present.push(false);
            }
        }
    }
    Ok((dimension, buffer))
}

fn parse_line(line: &str, line_number: usize) -> Result<Vec<f32>, DenseProviderError> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(position, token)| {
            token
                .parse::<f32>()
                .map_err(|_| DenseProviderError::InvalidNumber {
                    line: line_number,
                    position,
                    value: token.to_owned(),
                })
        })
        .collect()
}
