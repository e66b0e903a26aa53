use super::{DataSink, DatasetView};
use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use std::io::{BufWriter, Write};

/// Human-readable tables on stdout, one section per dataset.
pub struct TableSink {
    writer: BufWriter<Box<dyn Write>>,
}

impl TableSink {
    pub fn stdout() -> Self {
        Self {
            writer: BufWriter::new(Box::new(std::io::stdout())),
        }
    }
}

impl DataSink for TableSink {
    fn add_dataset(&mut self, view: &DatasetView<'_>) -> Result<()> {
        write!(self.writer, "{}", render_view(view))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn render_view(view: &DatasetView<'_>) -> String {
    let dataset = view.dataset;
    let mut out = format!(
        "{} Dataset\nTotal: {} | Shown: {} | Columns: {}\n",
        dataset.title(),
        view.total(),
        view.shown(),
        dataset.headers.len()
    );
    if let Some(description) = &dataset.info.description {
        out.push_str(description);
        out.push('\n');
    }

    if view.rows.is_empty() {
        out.push_str(&format!(
            "No results found in {}. Try adjusting the search or the filter.\n\n",
            dataset.display_name()
        ));
        return out;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header: Vec<Cell> = dataset
        .headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header);

    for row in &view.rows {
        let cells: Vec<Cell> = dataset
            .headers
            .iter()
            .map(|h| Cell::new(row.get(h).map(String::as_str).unwrap_or_default()))
            .collect();
        table.add_row(cells);
    }

    out.push_str(&format!("{table}\n\n"));
    out
}
