//! Loading request schemas from definition files.
//!
//! Each `.json` file in a directory holds one serialized [`RequestSchema`];
//! the file stem becomes the schema name. Filesystem access goes through the
//! [`FileSystem`] trait so loading can be tested without touching disk.
//!
//! ```json
//! {
//!   "params": {
//!     "required": true,
//!     "unknownKeys": "strict",
//!     "fields": {
//!       "id": {
//!         "type": "string",
//!         "checks": [{ "check": "pattern", "pattern": "^[0-9a-fA-F]{24}$" }]
//!       }
//!     }
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::registry::{RegistryError, SchemaRegistry};
use crate::schema::RequestSchema;

/// Environment trait for schema loading.
pub trait SchemaEnv: Send + Sync {
    type Fs: FileSystem;

    fn filesystem(&self) -> &Self::Fs;
}

/// Abstraction for filesystem operations.
pub trait FileSystem: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn read_file(&self, path: &Path) -> Result<String, Self::Error>;

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Self::Error>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    type Error = std::io::Error;

    fn read_file(&self, path: &Path) -> Result<String, Self::Error> {
        std::fs::read_to_string(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Self::Error> {
        let mut entries = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();
        Ok(entries)
    }
}

/// The process environment: the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv {
    fs: StdFileSystem,
}

impl SchemaEnv for StdEnv {
    type Fs = StdFileSystem;

    fn filesystem(&self) -> &Self::Fs {
        &self.fs
    }
}

/// Errors that can occur while loading schema files.
#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, Box<dyn std::error::Error + Send + Sync>),

    #[error("parse error in {0}: {1}")]
    Parse(PathBuf, serde_json::Error),

    #[error("invalid filename: {0}")]
    InvalidFileName(PathBuf),

    #[error("cannot register {0}: {1}")]
    Registry(PathBuf, RegistryError),

    #[error("{} schema files failed to load", .0.len())]
    Multiple(Vec<SchemaLoadError>),
}

impl SchemaLoadError {
    /// Flattens `Multiple` into its individual errors.
    pub fn errors(&self) -> Vec<&SchemaLoadError> {
        match self {
            SchemaLoadError::Multiple(errors) => errors.iter().flat_map(|e| e.errors()).collect(),
            other => vec![other],
        }
    }
}

impl SchemaRegistry {
    /// Loads every `.json` schema file in `path` from the real filesystem.
    pub fn load_dir(&self, path: impl AsRef<Path>) -> Result<usize, SchemaLoadError> {
        self.load_dir_with_env(path, &StdEnv::default())
    }

    /// Loads every `.json` schema file in `path` through `env`.
    ///
    /// Good files are registered even when others fail; all failures are
    /// returned together as [`SchemaLoadError::Multiple`]. On success,
    /// returns the number of schemas registered.
    pub fn load_dir_with_env<E: SchemaEnv>(
        &self,
        path: impl AsRef<Path>,
        env: &E,
    ) -> Result<usize, SchemaLoadError> {
        let path = path.as_ref();
        let fs = env.filesystem();
        let files = fs
            .read_dir(path)
            .map_err(|e| SchemaLoadError::Io(path.to_path_buf(), Box::new(e)))?;

        let mut loaded = 0;
        let mut errors = Vec::new();

        for file in files {
            if file.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match self.load_schema_file(&file, fs) {
                Ok(()) => loaded += 1,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "failed to load schema file");
                    errors.push(e);
                }
            }
        }

        info!(
            dir = %path.display(),
            loaded,
            failed = errors.len(),
            "loaded schema directory"
        );

        if errors.is_empty() {
            Ok(loaded)
        } else {
            Err(SchemaLoadError::Multiple(errors))
        }
    }

    fn load_schema_file<Fs: FileSystem>(&self, path: &Path, fs: &Fs) -> Result<(), SchemaLoadError> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SchemaLoadError::InvalidFileName(path.to_path_buf()))?;

        let content = fs
            .read_file(path)
            .map_err(|e| SchemaLoadError::Io(path.to_path_buf(), Box::new(e)))?;

        let schema: RequestSchema = serde_json::from_str(&content)
            .map_err(|e| SchemaLoadError::Parse(path.to_path_buf(), e))?;

        self.register(name, schema)
            .map_err(|e| SchemaLoadError::Registry(path.to_path_buf(), e))
    }
}
