//! CLI subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result};

use bandmark_core::model::TestSet;
use bandmark_core::parser;

pub mod compare;
pub mod fetch;
pub mod init;
pub mod score;
pub mod validate;

/// Load test sets from a TOML/JSON file or a directory of TOML files.
pub fn load_sets(path: &Path) -> Result<Vec<TestSet>> {
    if path.is_dir() {
        return parser::load_test_directory(path);
    }
    if path.extension().is_some_and(|ext| ext == "json") {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read test set file: {}", path.display()))?;
        let set: TestSet = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))?;
        return Ok(vec![set]);
    }
    Ok(vec![parser::parse_test_set(path)?])
}
