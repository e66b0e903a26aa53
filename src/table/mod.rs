//! Datasets: CSV-backed tables of string rows.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One record, keyed by column name.
pub type Row = HashMap<String, String>;

/// Descriptive metadata for a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetInfo {
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub primary_key: Option<String>,
}

/// A loaded table: ordered headers plus rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub key: String,
    pub info: DatasetInfo,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Load a dataset from a CSV file.
    pub fn load(key: &str, path: &Path, info: DatasetInfo) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Dataset: Failed to open {:?}", path))?;
        let (headers, rows) = read_csv(BufReader::new(file))
            .with_context(|| format!("Dataset: Failed to parse {:?}", path))?;
        tracing::info!(
            "Dataset '{}': {} rows, {} columns from {:?}",
            key,
            rows.len(),
            headers.len(),
            path
        );
        Ok(Dataset {
            key: key.to_string(),
            info,
            headers,
            rows,
        })
    }

    /// Name shown to users; falls back to the key.
    pub fn display_name(&self) -> &str {
        if self.info.name.is_empty() {
            &self.key
        } else {
            &self.info.name
        }
    }

    pub fn title(&self) -> String {
        match &self.info.emoji {
            Some(emoji) => format!("{} {}", emoji, self.display_name()),
            None => self.display_name().to_string(),
        }
    }
}

/// Read CSV text into headers and rows.
///
/// Headers and values are trimmed. Short records are padded with empty
/// strings, surplus cells are ignored.
pub fn read_csv<R: Read>(reader: R) -> Result<(Vec<String>, Vec<Row>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("record {}", line + 1))?;
        let row = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = record.get(idx).unwrap_or_default();
                (header.clone(), value.to_string())
            })
            .collect();
        rows.push(row);
    }

    Ok((headers, rows))
}
