//! Version matching heuristics
//!
//! Compares an installed version string against an expected specifier using
//! the `^`/`~` range markers as prefixes: caret requires the major component
//! to match, tilde requires major and minor, no marker means exact.
//!
//! This is a deliberate approximation of semver range satisfaction, not a
//! spec-complete implementation: pre-release tags, build metadata, `x`/`*`
//! wildcards and multi-range expressions are not handled. Components are
//! compared as strings, not numbers.

/// Does `installed` satisfy the `expected` specifier?
///
/// Rules in order, first match wins:
/// 1. verbatim equality (covers an expected string that already carries the
///    marker and equals the installed string exactly)
/// 2. equality after stripping a leading `^`/`~` from `expected`
/// 3. `^`: first components equal
/// 4. `~`: first two components equal
pub fn versions_match(installed: &str, expected: &str) -> bool {
    if installed == expected {
        return true;
    }

    let clean_expected = expected.strip_prefix(['^', '~']).unwrap_or(expected);
    if installed == clean_expected {
        return true;
    }

    let installed_parts: Vec<&str> = installed.split('.').collect();
    let expected_parts: Vec<&str> = clean_expected.split('.').collect();

    if expected.starts_with('^') && installed_parts.first() == expected_parts.first() {
        return true;
    }

    if expected.starts_with('~')
        && installed_parts.first() == expected_parts.first()
        && installed_parts.get(1) == expected_parts.get(1)
    {
        return true;
    }

    false
}
