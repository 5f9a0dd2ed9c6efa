//! Seed data — the static category/widget structure a board starts from.
//!
//! Shape: `{ "categories": [ { "id", "name", "widgets": [ { "id", "name",
//! "content", "type"?, "data"?, "options"? } ] } ] }`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, Category};

/// Seed compiled into the binary, used when no seed path is configured.
pub const DEFAULT_SEED: &str = include_str!("../seed/widgets.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed seed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate category id {0:?} in seed")]
    DuplicateCategory(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Seed {
    pub fn parse(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn builtin() -> Result<Self, SeedError> {
        Self::parse(DEFAULT_SEED)
    }

    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load from `path` when given, otherwise the built-in seed.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, SeedError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    /// Check category id uniqueness and build the initial board.
    pub fn into_board(self) -> Result<Board, SeedError> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.id.as_str()) {
                return Err(SeedError::DuplicateCategory(category.id.clone()));
            }
        }
        Ok(Board::from_categories(self.categories))
    }
}
