//! Resource catalog loaded once at startup.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use reshub_core::error::{AppError, ErrorKind};
use reshub_entity::ResourceDescriptor;

/// Reasons a catalog cannot be built.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog '{path}': {source}")]
    Read {
        /// Catalog path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The catalog document is not a list of descriptors.
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// A descriptor has an empty id.
    #[error("catalog entry #{index} has an empty id")]
    EmptyId {
        /// Position in the catalog list.
        index: usize,
    },
    /// Two descriptors share an id.
    #[error("duplicate resource id '{0}' in catalog")]
    DuplicateId(String),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::with_source(ErrorKind::Configuration, err.to_string(), err)
    }
}

/// Immutable, ordered list of reservable resources.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: Vec<ResourceDescriptor>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, rejecting empty and duplicate ids.
    pub fn new(resources: Vec<ResourceDescriptor>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(resources.len());
        for (position, resource) in resources.iter().enumerate() {
            if resource.id.trim().is_empty() {
                return Err(CatalogError::EmptyId { index: position });
            }
            if index.insert(resource.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(resource.id.clone()));
            }
        }
        Ok(Self { resources, index })
    }

    /// Parses a JSON array of descriptors.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CatalogError> {
        let resources: Vec<ResourceDescriptor> = serde_json::from_slice(bytes)?;
        Self::new(resources)
    }

    /// Reads and parses the catalog file at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&bytes)?;
        info!(path = %path.display(), resources = catalog.len(), "Loaded resource catalog");
        Ok(catalog)
    }

    /// Looks up a descriptor by id.
    pub fn get(&self, id: &str) -> Option<&ResourceDescriptor> {
        self.index.get(id).map(|&i| &self.resources[i])
    }

    /// Whether `id` names a catalog resource.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Descriptors in catalog-file order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.iter()
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
