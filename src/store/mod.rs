//! On-disk data files: the fund link list, the catalog and the last priced snapshot.

use crate::core::model::{FundCatalog, FundSnapshot};
use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const LINKS_FILE: &str = "mutual_funds_links.txt";
pub const CATALOG_FILE: &str = "mutual_funds_data.json";
pub const PRICED_FILE: &str = "fund_holdings_price.json";

pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    pub fn save_links(&self, links: &[String]) -> Result<()> {
        let mut contents = links.join("\n");
        contents.push('\n');
        self.write(LINKS_FILE, contents.as_bytes())
    }

    pub fn load_links(&self) -> Result<Vec<String>> {
        let path = self.path(LINKS_FILE);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read link list: {}", path.display()))?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn save_catalog(&self, catalog: &FundCatalog) -> Result<()> {
        self.write_json(CATALOG_FILE, catalog)
    }

    pub fn load_catalog(&self) -> Result<FundCatalog> {
        self.read_json(CATALOG_FILE)
    }

    pub fn save_priced(&self, snapshot: &FundSnapshot) -> Result<()> {
        self.write_json(PRICED_FILE, snapshot)
    }

    pub fn load_priced(&self) -> Result<FundSnapshot> {
        self.read_json(PRICED_FILE)
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let json = serde_json::to_vec_pretty(value)
            .with_context(|| format!("Failed to serialize {file}"))?;
        self.write(file, &json)
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.path(file);
        let contents = fs::read(&path)
            .with_context(|| format!("Failed to read data file: {}", path.display()))?;
        serde_json::from_slice(&contents)
            .with_context(|| format!("Failed to parse data file: {}", path.display()))
    }

    fn write(&self, file: &str, contents: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create directory: {}", self.root.display()))?;
        let path = self.path(file);
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write data file: {}", path.display()))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
