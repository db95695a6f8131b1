//! package.json parsing
//!
//! Merges all four dependency categories (dependencies, devDependencies,
//! peerDependencies, optionalDependencies) into a single map of package
//! name to declared version specifier. Later categories overwrite earlier
//! ones on a name collision, matching plain object-spread merge semantics.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {details}")]
    Parse { path: PathBuf, details: String },
}

/// Direct dependencies declared by the project manifest: name -> specifier
///
/// Specifiers are kept verbatim, range markers (`^`/`~`) included.
pub type DirectDependencies = HashMap<String, String>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    dependencies: Option<HashMap<String, String>>,
    dev_dependencies: Option<HashMap<String, String>>,
    peer_dependencies: Option<HashMap<String, String>>,
    optional_dependencies: Option<HashMap<String, String>>,
}

/// Load package.json and merge every dependency category
pub fn load_direct_dependencies(path: &Path) -> Result<DirectDependencies, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_direct_dependencies(&content).map_err(|e| ManifestError::Parse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}

fn parse_direct_dependencies(content: &str) -> Result<DirectDependencies, serde_json::Error> {
    let manifest: PackageJson = serde_json::from_str(content)?;

    let mut direct = DirectDependencies::new();
    for map in [
        manifest.dependencies,
        manifest.dev_dependencies,
        manifest.peer_dependencies,
        manifest.optional_dependencies,
    ]
    .into_iter()
    .flatten()
    {
        direct.extend(map);
    }

    Ok(direct)
}
