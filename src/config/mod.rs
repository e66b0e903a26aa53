use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::table::{Dataset, DatasetInfo};

/// Dataset catalogue loaded from YAML.
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    pub datasets: Vec<DatasetConfig>,
}

impl CatalogConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()?;
        let catalog: CatalogConfig = settings.try_deserialize()?;
        if catalog.datasets.is_empty() {
            anyhow::bail!("Config: {:?} lists no datasets", path);
        }
        Ok(catalog)
    }

    /// Load every dataset; relative paths resolve against `base_dir`.
    pub fn load_datasets(&self, base_dir: &Path) -> Result<Vec<Dataset>> {
        self.datasets
            .iter()
            .map(|entry| {
                let path = entry.resolve_path(base_dir);
                Dataset::load(&entry.key, &path, entry.info())
                    .with_context(|| format!("Config: Failed to load dataset '{}'", entry.key))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub key: String,
    pub path: PathBuf,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub primary_key: Option<String>,
}

impl DatasetConfig {
    pub fn resolve_path(&self, base_dir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            base_dir.join(&self.path)
        }
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            name: self.name.clone().unwrap_or_else(|| self.key.clone()),
            description: self.description.clone(),
            emoji: self.emoji.clone(),
            primary_key: self.primary_key.clone(),
        }
    }
}
