use std::fmt;
use std::path::{Path, PathBuf};

use services::{CatalogLoadError, builtin_catalog, parse_catalog_json};
use trainer_core::ProblemCatalog;

#[derive(Debug)]
pub enum LoadError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        source: CatalogLoadError,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Read { path, source } => {
                write!(f, "cannot read catalog {}: {source}", path.display())
            }
            LoadError::Parse {
                path: Some(path),
                source,
            } => write!(f, "invalid catalog {}: {source}", path.display()),
            LoadError::Parse { path: None, source } => {
                write!(f, "built-in catalog is invalid: {source}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Read { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
        }
    }
}

/// Load the catalog at `path`, or the built-in one when no path is given.
pub fn load(path: Option<&Path>) -> Result<ProblemCatalog, LoadError> {
    let Some(path) = path else {
        return builtin_catalog().map_err(|source| LoadError::Parse { path: None, source });
    };

    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog_json(&json).map_err(|source| LoadError::Parse {
        path: Some(path.to_path_buf()),
        source,
    })?;
    tracing::info!(path = %path.display(), problems = catalog.len(), "catalog loaded");
    Ok(catalog)
}
