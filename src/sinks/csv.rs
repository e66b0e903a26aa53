use super::{DataSink, DatasetView};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use time::Date;

pub struct CsvSink {
    writer: csv::Writer<Box<dyn Write>>,
    datasets: usize,
}

impl CsvSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(Box::new(file)))
    }

    pub fn stdout() -> Self {
        Self::from_writer(Box::new(std::io::stdout()))
    }

    fn from_writer(writer: Box<dyn Write>) -> Self {
        Self {
            // Fields with commas, quotes or newlines get quoted.
            writer: csv::WriterBuilder::new()
                .quote_style(csv::QuoteStyle::Necessary)
                .from_writer(writer),
            datasets: 0,
        }
    }
}

impl DataSink for CsvSink {
    fn add_dataset(&mut self, view: &DatasetView<'_>) -> Result<()> {
        if self.datasets > 0 {
            anyhow::bail!("Sink: CSV output holds a single dataset");
        }
        self.datasets += 1;

        let headers = &view.dataset.headers;
        self.writer.write_record(headers)?;
        for row in &view.rows {
            self.writer.write_record(
                headers
                    .iter()
                    .map(|header| row.get(header).map(String::as_str).unwrap_or_default()),
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// `{name}_export_{YYYY-MM-DD}.csv`. Path separators in the name become `_`.
pub fn export_file_name(name: &str, date: Date) -> Result<String> {
    let format = time::format_description::parse("[year]-[month]-[day]")?;
    let name: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    Ok(format!("{}_export_{}.csv", name, date.format(&format)?))
}

/// Write a dataset view into `dir`. Empty views are skipped.
pub fn export_dataset(dir: &Path, view: &DatasetView<'_>, date: Date) -> Result<Option<PathBuf>> {
    if view.rows.is_empty() {
        tracing::warn!("No data to export for {}", view.dataset.display_name());
        return Ok(None);
    }

    let path = dir.join(export_file_name(view.dataset.display_name(), date)?);
    let mut sink = CsvSink::new(&path)
        .with_context(|| format!("Sink: Failed to create export file {:?}", path))?;
    sink.add_dataset(view)?;
    sink.finish()?;
    tracing::info!("Exported {} rows to {:?}", view.shown(), path);
    Ok(Some(path))
}
