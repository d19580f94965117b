//! Access to per-company companyfacts documents

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::Cik;

#[derive(Debug, Error)]
pub enum LoadError {
    /// The company has no companyfacts document
    #[error("no companyfacts document for CIK {0}")]
    NotFound(Cik),
    #[error("failed to read companyfacts document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Source of raw companyfacts documents keyed by CIK
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, cik: Cik) -> Result<Vec<u8>, LoadError>;
}

/// Loader over an extracted `companyfacts.zip` directory
#[derive(Debug, Clone)]
pub struct CompanyFactsDir {
    root: PathBuf,
}

impl CompanyFactsDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, cik: Cik) -> PathBuf {
        self.root.join(cik.companyfacts_file_name())
    }
}

#[async_trait]
impl DocumentLoader for CompanyFactsDir {
    async fn load(&self, cik: Cik) -> Result<Vec<u8>, LoadError> {
        let path = self.path_for(cik);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LoadError::NotFound(cik)),
            Err(source) => Err(LoadError::Io { path, source }),
        }
    }
}
