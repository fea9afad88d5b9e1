use std::error::Error;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use batchtree_core::Pmfm;
use batchtree_model::{Batch, DenormalizedBatch};

/// Read a nested batch tree from a JSON file.
pub fn load_batch_tree(path: &Path, pmfms: &[Pmfm]) -> Result<Batch, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    Ok(Batch::from_json(value, pmfms)?)
}

/// Read a JSON array of denormalized batch records.
pub fn load_denormalized(path: &Path) -> Result<Vec<DenormalizedBatch>, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(DenormalizedBatch::list_from_json(&text)?)
}

/// A JSON fixture written to a temporary file, removed on drop.
pub struct FixtureFile {
    file: NamedTempFile,
}

impl FixtureFile {
    pub fn new(contents: &str) -> Result<Self, Box<dyn Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn from_batch_tree(root: &Batch) -> Result<Self, Box<dyn Error>> {
        let json = serde_json::to_string_pretty(&root.to_json()?)?;
        Self::new(&json)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
