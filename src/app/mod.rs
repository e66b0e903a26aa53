use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::builder::ConditionBuilder;
use crate::config::CatalogConfig;
use crate::dsl::{column_examples, filter, operator_groups};
use crate::search::search;
use crate::sinks::{CsvSink, DataSink, DatasetView, JsonlSink, TableSink, export_dataset};
use crate::table::{Dataset, DatasetInfo};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Single CSV file to view
    #[arg(short, long, conflicts_with = "datasets")]
    pub input: Option<PathBuf>,

    /// Dataset catalogue (YAML)
    #[arg(short, long, env = "TABSIFT_DATASETS")]
    pub datasets: Option<PathBuf>,

    /// Dataset key to show (default: first in the catalogue)
    #[arg(long)]
    pub dataset: Option<String>,

    /// Filter and show every dataset instead of only the selected one
    #[arg(long)]
    pub all: bool,

    /// WHERE clause, e.g. "WHERE Status = 'Active' AND Amount > 50000"
    #[arg(short, long = "where", value_name = "CLAUSE", conflicts_with = "conditions")]
    pub where_clause: Option<String>,

    /// Condition list (YAML) assembled into a WHERE clause
    #[arg(short, long)]
    pub conditions: Option<PathBuf>,

    /// Keep rows where any column contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output file, or '-' for stdout
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,

    /// Output format (auto-detected from the output extension if omitted)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also export each shown dataset to `{name}_export_{date}.csv` here
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// List operators and example clauses for the selected dataset
    #[arg(long)]
    pub describe: bool,

    /// Number of threads (default: all cores)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum OutputFormat {
    Table,
    Csv,
    Jsonl,
}

pub fn output_format_label(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Table => "table",
        OutputFormat::Csv => "csv",
        OutputFormat::Jsonl => "jsonl",
    }
}

/// Explicit format, else the output extension, else a table on stdout.
pub fn resolve_format(format: Option<OutputFormat>, output: &Path) -> Result<OutputFormat> {
    if let Some(format) = format {
        return Ok(format);
    }
    if output == Path::new("-") {
        return Ok(OutputFormat::Table);
    }
    let ext = output
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    match ext.as_deref() {
        Some("csv") => Ok(OutputFormat::Csv),
        Some("jsonl") | Some("json") => Ok(OutputFormat::Jsonl),
        Some("txt") => Ok(OutputFormat::Table),
        _ => anyhow::bail!("CLI: Could not detect output format from extension; use --format"),
    }
}

pub fn init_sink(format: OutputFormat, output: &Path) -> Result<Box<dyn DataSink>> {
    let to_stdout = output == Path::new("-");
    match format {
        OutputFormat::Table => {
            if !to_stdout {
                anyhow::bail!("CLI: Table output only goes to stdout; use csv or jsonl for files");
            }
            tracing::info!("Sink: {} -> stdout", output_format_label(format));
            Ok(Box::new(TableSink::stdout()))
        }
        OutputFormat::Csv if to_stdout => {
            tracing::info!("Sink: {} -> stdout", output_format_label(format));
            Ok(Box::new(CsvSink::stdout()))
        }
        OutputFormat::Csv => {
            tracing::info!("Sink: {} -> {:?}", output_format_label(format), output);
            Ok(Box::new(CsvSink::new(output).with_context(|| {
                format!("Sink: Failed to create {:?}", output)
            })?))
        }
        OutputFormat::Jsonl if to_stdout => {
            tracing::info!("Sink: {} -> stdout", output_format_label(format));
            Ok(Box::new(JsonlSink::stdout()))
        }
        OutputFormat::Jsonl => {
            tracing::info!("Sink: {} -> {:?}", output_format_label(format), output);
            Ok(Box::new(JsonlSink::new(output).with_context(|| {
                format!("Sink: Failed to create {:?}", output)
            })?))
        }
    }
}

/// Load the datasets named on the command line.
pub fn load_datasets(cli: &Cli) -> Result<Vec<Dataset>> {
    if let Some(input) = &cli.input {
        let key = input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("input")
            .to_string();
        let info = DatasetInfo {
            name: key.clone(),
            ..Default::default()
        };
        return Ok(vec![Dataset::load(&key, input, info)?]);
    }

    let Some(catalog_path) = &cli.datasets else {
        anyhow::bail!("CLI: Provide --input <CSV> or --datasets <YAML>");
    };
    let catalog = CatalogConfig::load(catalog_path)
        .with_context(|| format!("Config: Failed to load {:?}", catalog_path))?;
    let base_dir = catalog_path.parent().unwrap_or(Path::new("."));
    catalog.load_datasets(base_dir)
}

/// Index of the selected dataset.
pub fn select_dataset(datasets: &[Dataset], key: Option<&str>) -> Result<usize> {
    match key {
        None => Ok(0),
        Some(key) => datasets.iter().position(|d| d.key == key).with_context(|| {
            let known: Vec<&str> = datasets.iter().map(|d| d.key.as_str()).collect();
            format!("CLI: Unknown dataset '{}' (known: {})", key, known.join(", "))
        }),
    }
}

/// The clause text to apply: expert text, the builder's text, or nothing.
pub fn resolve_clause(cli: &Cli, current: &Dataset) -> Result<String> {
    if let Some(text) = &cli.where_clause {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.conditions {
        let builder = ConditionBuilder::load(current.headers.clone(), path)?;
        tracing::info!(
            "Built {} condition(s): {}",
            builder.conditions().len(),
            if builder.where_clause().is_empty() {
                "No conditions set"
            } else {
                builder.where_clause()
            }
        );
        return Ok(builder.where_clause().to_string());
    }
    Ok(String::new())
}

/// Apply the clause and search term to each dataset.
///
/// Datasets are independent, so they are filtered in parallel. Any filter
/// error aborts the whole run.
pub fn apply_filters<'a>(
    datasets: &[&'a Dataset],
    clause: &str,
    term: Option<&str>,
) -> Result<Vec<DatasetView<'a>>> {
    let views = datasets
        .par_iter()
        .map(|&dataset| -> Result<DatasetView<'a>> {
            let rows = filter(&dataset.rows, clause)?;
            let rows = match term {
                Some(term) => search(rows, term),
                None => rows,
            };
            Ok(DatasetView { dataset, rows })
        })
        .collect::<Result<Vec<_>>>()?;

    for view in &views {
        tracing::info!(
            "Dataset '{}': {} of {} rows shown",
            view.dataset.key,
            view.shown(),
            view.total()
        );
    }
    Ok(views)
}

/// Operator reference and example clauses for one dataset.
pub fn describe(dataset: &Dataset) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Dataset", dataset.title());
    if let Some(description) = &dataset.info.description {
        let _ = writeln!(out, "{}", description);
    }
    if let Some(key) = &dataset.info.primary_key {
        let _ = writeln!(out, "Primary key: {}", key);
    }

    let _ = writeln!(out, "\nOperators:");
    for (category, ops) in operator_groups() {
        let _ = writeln!(out, "  {}:", category);
        for op in ops {
            let hint = op.placeholder();
            if hint.is_empty() {
                let _ = writeln!(out, "    {:<12} {}", op.token(), op.label());
            } else {
                let _ = writeln!(out, "    {:<12} {} ({})", op.token(), op.label(), hint);
            }
        }
    }
    let _ = writeln!(out, "  Logical:\n    AND, OR (AND binds first: A AND B OR C = A AND (B OR C))");

    let _ = writeln!(out, "\nColumns:");
    for header in &dataset.headers {
        let _ = writeln!(out, "  {}", header);
        for example in column_examples(header) {
            let _ = writeln!(out, "    WHERE {}", example);
        }
    }
    out
}

/// Run the viewer; returns the number of rows written.
pub fn run(cli: &Cli) -> Result<usize> {
    let datasets = load_datasets(cli)?;
    let current = select_dataset(&datasets, cli.dataset.as_deref())?;

    if cli.describe {
        print!("{}", describe(&datasets[current]));
        return Ok(0);
    }

    let format = resolve_format(cli.format, &cli.output)?;
    let clause = resolve_clause(cli, &datasets[current])?;

    let selected: Vec<&Dataset> = if cli.all {
        datasets.iter().collect()
    } else {
        vec![&datasets[current]]
    };
    if format == OutputFormat::Csv && selected.len() > 1 {
        anyhow::bail!("CLI: CSV output holds a single dataset; use jsonl or --export-dir");
    }

    let views = apply_filters(&selected, &clause, cli.search.as_deref())?;

    let mut sink = init_sink(format, &cli.output)?;
    for view in &views {
        sink.add_dataset(view)?;
    }
    sink.finish().context("Sink: Failed to finalize output")?;

    if let Some(dir) = &cli.export_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Sink: Failed to create export directory {:?}", dir))?;
        let today = time::OffsetDateTime::now_utc().date();
        for view in &views {
            export_dataset(dir, view, today)?;
        }
    }

    Ok(views.iter().map(DatasetView::shown).sum())
}
