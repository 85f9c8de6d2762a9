//! Statement catalog: the fixed battery of scored statements.
//!
//! The catalog is loaded once at process start, either from the YAML embedded
//! in the binary or from a file named by configuration, and is read-only
//! afterwards. Lookups go through an id index; grouped iteration goes through
//! a dimension index that preserves catalog order.

pub mod statement;

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::utilities::errors::CatalogError;

pub use statement::{AnswerKind, DropdownChoice, Statement};

/// Default catalog, embedded at compile time.
pub const DEFAULT_CATALOG_YAML: &str = include_str!("statements.yaml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    version: Option<String>,
    statements: Vec<Statement>,
}

/// Immutable, indexed statement catalog.
#[derive(Debug, Clone, Serialize)]
pub struct StatementCatalog {
    version: Option<String>,
    statements: Vec<Statement>,
    #[serde(skip)]
    by_id: HashMap<u32, usize>,
    #[serde(skip)]
    by_dimension: IndexMap<String, Vec<usize>>,
}

impl StatementCatalog {
    /// Build a catalog from statements, validating ids and answer kinds.
    pub fn new(statements: Vec<Statement>) -> Result<Self, CatalogError> {
        Self::build(None, statements)
    }

    fn build(version: Option<String>, statements: Vec<Statement>) -> Result<Self, CatalogError> {
        if statements.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut by_id = HashMap::with_capacity(statements.len());
        let mut by_dimension: IndexMap<String, Vec<usize>> = IndexMap::new();

        for (idx, statement) in statements.iter().enumerate() {
            statement
                .check()
                .map_err(|message| CatalogError::InvalidStatement {
                    id: statement.id,
                    message,
                })?;
            if by_id.insert(statement.id, idx).is_some() {
                return Err(CatalogError::DuplicateId(statement.id));
            }
            by_dimension
                .entry(statement.dimension.clone())
                .or_default()
                .push(idx);
        }

        Ok(Self {
            version,
            statements,
            by_id,
            by_dimension,
        })
    }

    /// Parse a catalog document.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::build(file.version, file.statements)
    }

    /// Load the embedded default catalog.
    pub fn load_default() -> Result<Self, CatalogError> {
        Self::from_yaml(DEFAULT_CATALOG_YAML)
    }

    /// Load a catalog from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from `path` when given, otherwise the embedded default.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => {
                log::info!("Loading statement catalog from {}", p.display());
                Self::from_file(p)
            }
            None => Self::load_default(),
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Look up a statement by id.
    pub fn get(&self, id: u32) -> Option<&Statement> {
        self.by_id.get(&id).map(|&idx| &self.statements[idx])
    }

    /// All statements in catalog order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Dimension names in first-seen catalog order.
    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.by_dimension.keys().map(String::as_str)
    }

    /// Statements belonging to `dimension`, in catalog order. Empty if unknown.
    pub fn in_dimension<'a>(&'a self, dimension: &str) -> impl Iterator<Item = &'a Statement> + 'a {
        self.by_dimension
            .get(dimension)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&idx| &self.statements[idx])
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
