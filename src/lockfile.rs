//! package-lock.json parsing
//!
//! Reads the flat `packages` map from package-lock.json (lockfileVersion 2
//! and 3) into a `PackageGraph`: one record per install path, in file order.
//!
//! File order matters: the resolver's first-match semantics are defined in
//! terms of the order packages appear in the lockfile, so records are kept
//! in an ordered sequence rather than a map (serde_json's `preserve_order`
//! feature keeps the JSON object order intact).

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LockfileError {
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {details}")]
    Parse { path: PathBuf, details: String },
}

/// One entry from the lockfile `packages` map
///
/// `path` is the install path key ("" for the project root,
/// "node_modules/lodash", "node_modules/send/node_modules/ms", ...).
/// `dependencies` holds the names this package declares, in file order.
#[derive(Debug, Clone)]
pub struct PackageRecord {
    pub path: String,
    pub version: Option<String>,
    pub dependencies: Vec<String>,
}

/// The full set of installed packages, in lockfile order
#[derive(Debug, Default)]
pub struct PackageGraph {
    pub records: Vec<PackageRecord>,
}

/// Structure for package-lock.json (lockfileVersion 2 and 3)
///
/// The `packages` values are kept as raw JSON objects so the key order of
/// each `dependencies` map survives deserialization.
#[derive(Deserialize)]
struct PackageLockfile {
    packages: Option<serde_json::Map<String, Value>>,
}

/// Load a package-lock.json into a PackageGraph
///
/// A lockfile without a `packages` map yields an empty graph. A missing or
/// unparsable file is an error; the caller treats it as fatal.
pub fn load(path: &Path) -> Result<PackageGraph, LockfileError> {
    let content = fs::read_to_string(path).map_err(|source| LockfileError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&content).map_err(|e| LockfileError::Parse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}

/// Parse package-lock.json content into a PackageGraph
pub fn parse(content: &str) -> Result<PackageGraph, serde_json::Error> {
    let lockfile: PackageLockfile = serde_json::from_str(content)?;

    let mut records = Vec::new();
    for (path, entry) in lockfile.packages.unwrap_or_default() {
        let version = entry
            .get("version")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let dependencies = entry
            .get("dependencies")
            .and_then(|v| v.as_object())
            .map(|deps| deps.keys().cloned().collect())
            .unwrap_or_default();

        records.push(PackageRecord {
            path,
            version,
            dependencies,
        });
    }

    Ok(PackageGraph { records })
}
