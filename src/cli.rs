use clap::Parser;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// CLI tool that audits a project's npm dependency tree
#[derive(Parser, Debug)]
#[command(name = "depaudit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Package list file (one `name` or `name:version` per line)
    #[arg(long, short = 'p')]
    pub packages: Option<PathBuf>,

    /// Project manifest (package.json)
    #[arg(long, short = 'm')]
    pub manifest: Option<PathBuf>,

    /// Lockfile (package-lock.json)
    #[arg(long, short = 'l')]
    pub lockfile: Option<PathBuf>,

    /// Where to write the JSON summary
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Print the structured result set as JSON instead of the text report
    #[arg(long)]
    pub json: bool,
}

#[derive(Error, Debug)]
pub enum PackageListError {
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {details}")]
    Parse { path: PathBuf, details: String },
}

/// A requested package: name with an optional expected version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageQuery {
    pub name: String,
    pub expected_version: Option<String>,
}

impl fmt::Display for PackageQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected_version {
            Some(v) => write!(f, "{}:{}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for PackageQuery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Format: <name>[:<version>]. Scoped npm names never contain a
        // colon, so the first colon always separates name from version.
        let (name, version) = match s.split_once(':') {
            Some((name, version)) => (name.trim(), Some(version.trim())),
            None => (s.trim(), None),
        };

        if name.is_empty() {
            return Err("Package name cannot be empty".to_string());
        }

        Ok(PackageQuery {
            name: name.to_string(),
            expected_version: version.filter(|v| !v.is_empty()).map(str::to_string),
        })
    }
}

/// Load the package list file: one query per line, blank lines ignored,
/// surrounding whitespace trimmed.
pub fn load_package_list(path: &Path) -> Result<Vec<PackageQuery>, PackageListError> {
    let content = fs::read_to_string(path).map_err(|source| PackageListError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_package_list(&content).map_err(|details| PackageListError::Parse {
        path: path.to_path_buf(),
        details,
    })
}

fn parse_package_list(content: &str) -> Result<Vec<PackageQuery>, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PackageQuery::from_str)
        .collect()
}
