//! Result buckets, console report and persisted summary
//!
//! One pass over the requested package list classifies every name into one
//! of three buckets: direct, transient (with its attribution chain) or not
//! found. The same structure backs both the human-readable console report
//! and the JSON summary file written for downstream tooling.

use crate::cli::PackageQuery;
use crate::graph::{self, ReverseIndex};
use crate::lockfile::PackageGraph;
use crate::manifest::DirectDependencies;
use crate::version::versions_match;
use owo_colors::OwoColorize;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Three-state version comparison outcome
///
/// Serialized as JSON `true` / `false` / `"N/A"` so the summary file keeps
/// the shape consumers already expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionMatch {
    Match,
    Mismatch,
    NotApplicable,
}

impl Serialize for VersionMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VersionMatch::Match => serializer.serialize_bool(true),
            VersionMatch::Mismatch => serializer.serialize_bool(false),
            VersionMatch::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

/// A requested package that is a declared direct dependency
///
/// `installed_version` holds the specifier declared in the manifest,
/// range marker included.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectEntry {
    pub name: String,
    pub expected_version: Option<String>,
    pub installed_version: String,
    pub version_match: VersionMatch,
}

/// A requested package pulled in transitively
///
/// `required_by` is the direct dependency at the head of the chain, or
/// "unknown" when no attribution chain could be traced (orphan or cycle),
/// in which case `chain` is empty.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransientEntry {
    pub name: String,
    pub expected_version: Option<String>,
    pub installed_version: Option<String>,
    pub version_match: VersionMatch,
    pub required_by: String,
    pub chain: Vec<String>,
}

/// A requested package absent from the whole tree
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundEntry {
    pub name: String,
    pub expected_version: Option<String>,
}

/// The full three-bucket result set
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub direct: Vec<DirectEntry>,
    pub transient: Vec<TransientEntry>,
    pub not_found: Vec<NotFoundEntry>,
}

/// Classify every requested package in a single pass
///
/// Bucket order follows the input list order, so a fixed input always
/// produces an identical result set.
pub fn check_packages(
    queries: &[PackageQuery],
    direct: &DirectDependencies,
    graph: &PackageGraph,
) -> Report {
    let index = ReverseIndex::build(graph);
    let mut report = Report::default();

    for query in queries {
        let expected = query.expected_version.as_deref();

        if let Some(specifier) = direct.get(&query.name) {
            let declared = specifier.strip_prefix(['^', '~']).unwrap_or(specifier);
            report.direct.push(DirectEntry {
                name: query.name.clone(),
                expected_version: query.expected_version.clone(),
                installed_version: specifier.clone(),
                version_match: match_status(Some(declared), expected),
            });
            continue;
        }

        if graph::contains(graph, &query.name) {
            let installed = graph::installed_version(graph, &query.name);
            let (required_by, chain) = match graph::resolve_chain(&query.name, direct, &index) {
                Some(chain) => (chain[0].clone(), chain),
                None => ("unknown".to_string(), Vec::new()),
            };

            report.transient.push(TransientEntry {
                name: query.name.clone(),
                expected_version: query.expected_version.clone(),
                installed_version: installed.map(str::to_string),
                version_match: match_status(installed, expected),
                required_by,
                chain,
            });
            continue;
        }

        report.not_found.push(NotFoundEntry {
            name: query.name.clone(),
            expected_version: query.expected_version.clone(),
        });
    }

    report
}

// No expected version means the comparison is not applicable; a missing
// installed version against a supplied expectation counts as a mismatch.
fn match_status(installed: Option<&str>, expected: Option<&str>) -> VersionMatch {
    match expected {
        None => VersionMatch::NotApplicable,
        Some(expected) => match installed {
            Some(installed) if versions_match(installed, expected) => VersionMatch::Match,
            _ => VersionMatch::Mismatch,
        },
    }
}

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// Print the sectioned human-readable report to stdout
pub fn render(report: &Report, total_checked: usize) {
    println!("{}", RULE);
    println!("DIRECT DEPENDENCIES FOUND");
    println!("{}", RULE);
    if report.direct.is_empty() {
        println!("None found.");
    } else {
        for entry in &report.direct {
            println!("\n✓ {}", entry.name);
            println!(
                "  └─ Expected: {}",
                entry.expected_version.as_deref().unwrap_or("N/A")
            );
            println!("  └─ Installed: {}", entry.installed_version);
            println!("  └─ Version Status: {}", status_label(entry.version_match));
        }
    }

    println!("\n{}", RULE);
    println!("TRANSIENT DEPENDENCIES FOUND");
    println!("{}", RULE);
    if report.transient.is_empty() {
        println!("None found.");
    } else {
        for entry in &report.transient {
            println!("\n✓ {}", entry.name);
            println!(
                "  └─ Expected: {}",
                entry.expected_version.as_deref().unwrap_or("N/A")
            );
            println!(
                "  └─ Installed: {}",
                entry.installed_version.as_deref().unwrap_or("N/A")
            );
            println!("  └─ Version Status: {}", status_label(entry.version_match));
            println!("  └─ Required by: {}", entry.required_by);
            if entry.chain.len() > 1 {
                println!("  └─ Full chain: {}", entry.chain.join(" → "));
            }
        }
    }

    println!("\n{}", RULE);
    println!("SUMMARY");
    println!("{}", RULE);
    println!("Total packages checked: {}", total_checked);
    println!("Direct dependencies found: {}", report.direct.len());
    println!("Transient dependencies found: {}", report.transient.len());
    println!("Not found in project: {}", report.not_found.len());

    let (matches, mismatches) = report.version_tally();
    if matches + mismatches > 0 {
        println!("\nVersion Analysis (for packages with expected versions):");
        println!("  ✓ Matching versions: {}", matches);
        println!("  ✗ Mismatched versions: {}", mismatches);
    }
    println!("{}\n", RULE);
}

fn status_label(version_match: VersionMatch) -> String {
    match version_match {
        VersionMatch::Match => "✓ MATCH".green().to_string(),
        VersionMatch::Mismatch => "✗ MISMATCH".red().to_string(),
        VersionMatch::NotApplicable => "N/A".yellow().to_string(),
    }
}

impl Report {
    /// Match/mismatch counts over entries that carried an expected version
    pub fn version_tally(&self) -> (usize, usize) {
        let statuses = self
            .direct
            .iter()
            .map(|e| e.version_match)
            .chain(self.transient.iter().map(|e| e.version_match));

        let mut matches = 0;
        let mut mismatches = 0;
        for status in statuses {
            match status {
                VersionMatch::Match => matches += 1,
                VersionMatch::Mismatch => mismatches += 1,
                VersionMatch::NotApplicable => {}
            }
        }
        (matches, mismatches)
    }

    /// Pretty-printed JSON of the three buckets
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the JSON summary file
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ReportError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }
}
