use super::{DataSink, DatasetView};
use anyhow::Result;
use serde_json::{Map, Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One JSON object per kept row: `{"dataset": key, "row": {...}}`.
pub struct JsonlSink {
    writer: BufWriter<Box<dyn Write>>,
}

impl JsonlSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(Box::new(file)),
        })
    }

    pub fn stdout() -> Self {
        Self {
            writer: BufWriter::new(Box::new(std::io::stdout())),
        }
    }
}

impl DataSink for JsonlSink {
    fn add_dataset(&mut self, view: &DatasetView<'_>) -> Result<()> {
        for row in &view.rows {
            let mut fields = Map::new();
            for header in &view.dataset.headers {
                let value = row.get(header).cloned().unwrap_or_default();
                fields.insert(header.clone(), Value::String(value));
            }
            let record = json!({ "dataset": view.dataset.key, "row": fields });
            serde_json::to_writer(&mut self.writer, &record)?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
