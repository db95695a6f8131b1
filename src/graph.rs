//! Reverse dependency index and attribution-chain resolution
//!
//! Built from the flat lockfile package map. The reverse index maps a
//! package name to the packages that declare it as a dependency; resolving
//! walks that index upward until a declared direct dependency is reached,
//! yielding the attribution chain from the direct dependency down to the
//! queried package.
//!
//! Package names may appear at several install paths in a nested tree. The
//! resolver matches by name and takes the first match in lockfile order;
//! disambiguating by path depth would change observable results.

use crate::lockfile::PackageGraph;
use crate::manifest::DirectDependencies;
use std::collections::{HashMap, HashSet};

/// Sentinel for a dependency declared by the project root manifest.
///
/// Never a valid attribution target: the project itself is not a package
/// that "requires" anything in the report's sense.
pub const ROOT: &str = "ROOT";

/// Reduce a lockfile install path to the name of the immediate container
///
/// Strips the leading `node_modules/` prefix and, for nested installs like
/// `node_modules/send/node_modules/ms`, keeps only the innermost segment.
/// The empty path (the project root entry) becomes the `ROOT` sentinel.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ROOT.to_string();
    }

    let stripped = path.strip_prefix("node_modules/").unwrap_or(path);
    match stripped.rsplit_once("/node_modules/") {
        Some((_, innermost)) => innermost.to_string(),
        None => stripped.to_string(),
    }
}

/// Maps a package name to the cleaned identifiers of its dependents
///
/// Each entry's list is in discovery order while scanning the package
/// graph; the resolver relies on that order for deterministic first-match
/// tie-breaking.
#[derive(Debug, Default)]
pub struct ReverseIndex {
    dependents: HashMap<String, Vec<String>>,
}

impl ReverseIndex {
    /// Build the index by scanning every record's declared dependencies
    pub fn build(graph: &PackageGraph) -> Self {
        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();

        for record in &graph.records {
            if record.dependencies.is_empty() {
                continue;
            }
            let dependent = clean_path(&record.path);
            for dep_name in &record.dependencies {
                dependents
                    .entry(dep_name.clone())
                    .or_default()
                    .push(dependent.clone());
            }
        }

        Self { dependents }
    }

    /// Who declares a dependency on `name`, in discovery order
    pub fn parents(&self, name: &str) -> &[String] {
        self.dependents.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Find the attribution chain from a direct dependency down to `name`
///
/// Returns the full chain, first element a declared direct dependency and
/// last element `name`; a direct dependency attributes to itself as a
/// one-element chain. Returns `None` when no direct-dependency ancestor
/// exists (orphaned transitive package, or a cycle with no exit).
///
/// The visited set is shared across the whole walk for one query, so
/// cyclic dependency declarations (legal in real package graphs) cannot
/// recurse forever.
pub fn resolve_chain(
    name: &str,
    direct: &DirectDependencies,
    index: &ReverseIndex,
) -> Option<Vec<String>> {
    let mut visited = HashSet::new();
    walk(name, direct, index, &mut visited)
}

fn walk(
    name: &str,
    direct: &DirectDependencies,
    index: &ReverseIndex,
    visited: &mut HashSet<String>,
) -> Option<Vec<String>> {
    if !visited.insert(name.to_string()) {
        return None;
    }

    if direct.contains_key(name) {
        return Some(vec![name.to_string()]);
    }

    for parent in index.parents(name) {
        if parent.as_str() == ROOT {
            continue;
        }

        // First parent that is itself a direct dependency wins.
        if direct.contains_key(parent) {
            return Some(vec![parent.clone(), name.to_string()]);
        }

        if let Some(mut chain) = walk(parent, direct, index, visited) {
            chain.push(name.to_string());
            return Some(chain);
        }
    }

    None
}

/// Look up the resolved version of `name` from the lockfile
///
/// First record whose cleaned path equals the name, or whose raw path ends
/// with `/name`, wins. With duplicated names at different nesting depths
/// this picks the first in lockfile order, which is deterministic but not
/// guaranteed to be the hoisted copy.
pub fn installed_version<'a>(graph: &'a PackageGraph, name: &str) -> Option<&'a str> {
    for record in &graph.records {
        let cleaned = clean_path_for_lookup(&record.path);
        if cleaned == name || record.path.ends_with(&format!("/{}", name)) {
            return record.version.as_deref();
        }
    }
    None
}

/// Does `name` appear anywhere in the installed tree?
///
/// Deliberately permissive: matches the cleaned path exactly, or any raw
/// path containing `/name` or ending with `name`. The report builder calls
/// this before attributing, so the resolver never sees absent names.
pub fn contains(graph: &PackageGraph, name: &str) -> bool {
    let slash_name = format!("/{}", name);
    graph.records.iter().any(|record| {
        clean_path_for_lookup(&record.path) == name
            || record.path.contains(&slash_name)
            || record.path.ends_with(name)
    })
}

// Version lookup cleans paths without the ROOT sentinel substitution; the
// root entry keeps its empty path and simply never matches a name.
fn clean_path_for_lookup(path: &str) -> &str {
    let stripped = path.strip_prefix("node_modules/").unwrap_or(path);
    match stripped.rsplit_once("/node_modules/") {
        Some((_, innermost)) => innermost,
        None => stripped,
    }
}
