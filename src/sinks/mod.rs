use anyhow::Result;

use crate::table::{Dataset, Row};

pub mod csv;
pub mod jsonl;
pub mod table;

pub use self::csv::{CsvSink, export_dataset};
pub use self::jsonl::JsonlSink;
pub use self::table::TableSink;

/// The rows of one dataset that survived filtering and search.
#[derive(Debug, Clone)]
pub struct DatasetView<'a> {
    pub dataset: &'a Dataset,
    pub rows: Vec<&'a Row>,
}

impl DatasetView<'_> {
    pub fn total(&self) -> usize {
        self.dataset.rows.len()
    }

    pub fn shown(&self) -> usize {
        self.rows.len()
    }
}

pub trait DataSink {
    fn add_dataset(&mut self, view: &DatasetView<'_>) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}
