//! Supported-branch resolution
//!
//! A release belongs to the first declared branch whose tilde range
//! contains it. Only when no tilde range matches are the wider caret
//! ranges tried, so a narrow maintenance branch such as `11.7.` is not
//! swallowed by a wider line declared before it.

use crate::domain::Version;
use std::sync::LazyLock;

/// Branch returned for versions outside every declared branch
pub const UNCLASSIFIED_BRANCH: &str = "0.0.0";

static UNCLASSIFIED: LazyLock<Version> =
    LazyLock::new(|| Version::parse(UNCLASSIFIED_BRANCH).unwrap());

/// Parses normalized branch prefixes, skipping any that are not versions
pub fn parse_branches<S: AsRef<str>>(branches: &[S]) -> Vec<Version> {
    branches
        .iter()
        .filter_map(|branch| Version::parse(branch.as_ref()).ok())
        .collect()
}

/// Returns the supported branch `version` belongs to
pub fn resolve_branch(version: &Version, supported: &[Version]) -> Version {
    supported
        .iter()
        .find(|branch| tilde_contains(branch, version))
        .or_else(|| supported.iter().find(|branch| caret_contains(branch, version)))
        .unwrap_or(&UNCLASSIFIED)
        .clone()
}

/// True for the branch [`resolve_branch`] returns when nothing matched
pub fn is_unclassified(branch: &Version) -> bool {
    *branch == *UNCLASSIFIED
}

/// `~X.Y.Z` allows `>=X.Y.Z <X.(Y+1)`; `~X.Y` and `~X` allow `<(X+1)`
fn tilde_contains(branch: &Version, version: &Version) -> bool {
    let [major, minor, _] = branch.release();
    let upper = if branch.precision() >= 3 {
        [major, minor + 1, 0]
    } else {
        [major + 1, 0, 0]
    };
    within(branch, version, upper)
}

/// `^` allows everything below the next change of the leftmost non-zero component
fn caret_contains(branch: &Version, version: &Version) -> bool {
    let [major, minor, patch] = branch.release();
    let upper = if major > 0 || branch.precision() == 1 {
        [major + 1, 0, 0]
    } else if minor > 0 || branch.precision() == 2 {
        [0, minor + 1, 0]
    } else {
        [0, 0, patch + 1]
    };
    within(branch, version, upper)
}

// Range ends are dev-floored like composer's, so pre-releases count
// by their release number alone.
fn within(branch: &Version, version: &Version, upper: [u64; 3]) -> bool {
    let release = version.release();
    release >= branch.release() && release < upper
}
