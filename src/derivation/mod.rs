//! Conflict constraint derivation
//!
//! Turns a project's release history into the version ranges a composer
//! metapackage must conflict with:
//! - [`branch`] maps a release to the supported branch it belongs to
//! - [`timeline`] orders releases and splits them into security epochs
//! - [`formatter`] renders the result as a composer constraint string
//!
//! [`derive_constraints`] never fails. Degenerate histories fall back to
//! a single constraint covering everything that cannot be shown secure.

pub mod branch;
pub mod formatter;
pub mod timeline;

pub use branch::{is_unclassified, parse_branches, resolve_branch, UNCLASSIFIED_BRANCH};
pub use formatter::{format, format_with, DEFAULT_SEPARATOR};
pub use timeline::{EpochWalk, ReleaseTimeline, TimelineEntry};

use crate::domain::{Bound, Constraint, Project, Version};

/// Derives the conflict constraints for a project, oldest range first
pub fn derive_constraints(project: &Project) -> Vec<Constraint> {
    if project.is_unsupported() {
        return vec![Constraint::MatchAll];
    }
    let branches = parse_branches(&project.normalized_supported_branches());
    if branches.is_empty() {
        return vec![Constraint::MatchAll];
    }

    let timeline = ReleaseTimeline::from_project(project);
    let walk = timeline.epochs();

    let mut constraints = build_ranges(&walk, &branches);
    constraints.retain(|constraint| match constraint {
        Constraint::Bound(bound) if constraint.is_upper_bound_only() => {
            timeline.has_insecure_after(&bound.version)
        }
        _ => true,
    });

    let has_insecure = walk.last_insecure.is_some();
    if constraints.is_empty() {
        return fallback(&timeline, &walk, has_insecure);
    }
    if !has_insecure {
        if let Some(fix) = &walk.latest_security_fix {
            return vec![Constraint::less_than(fix.clone())];
        }
    }

    constraints.reverse();
    constraints
}

/// Builds one range per epoch, newest epoch first, followed by the bound
/// below the oldest known-good release
fn build_ranges(walk: &EpochWalk, branches: &[Version]) -> Vec<Constraint> {
    let groups: Vec<&[Version]> = walk.non_empty_groups().collect();
    let mut constraints = Vec::with_capacity(groups.len() + 1);

    for (index, group) in groups.iter().enumerate().rev() {
        let Some(first) = group.first() else {
            continue;
        };
        let branch = Some(resolve_branch(first, branches)).filter(|b| !is_unclassified(b));
        let previous_newest = index.checked_sub(1).and_then(|prev| groups[prev].last());

        // Only reach back into the previous epoch when it lives on the same
        // branch, or when no declared branch covers this one.
        let lower = match (branch, previous_newest) {
            (Some(branch), Some(newest)) if *newest >= branch => {
                Bound::greater_than(newest.clone())
            }
            (Some(branch), _) => Bound::greater_or_equal(branch),
            (None, Some(newest)) => Bound::greater_than(newest.clone()),
            // The standalone bound below covers the oldest epoch.
            (None, None) => continue,
        };

        if lower.version < *first {
            constraints.push(Constraint::interval(lower, Bound::less_than(first.clone())));
        }
    }

    if let Some(oldest) = groups.first().and_then(|group| group.first()) {
        let branch = resolve_branch(oldest, branches);
        let upper = if is_unclassified(&branch) {
            oldest.clone()
        } else {
            branch
        };
        constraints.push(Constraint::less_than(upper));
    }

    constraints
}

fn fallback(timeline: &ReleaseTimeline, walk: &EpochWalk, has_insecure: bool) -> Vec<Constraint> {
    if has_insecure {
        if let Some(newest) = timeline.newest() {
            return vec![Constraint::less_or_equal(newest.clone())];
        }
    }
    match &walk.latest_security_fix {
        Some(fix) => vec![Constraint::less_than(fix.clone())],
        None => vec![Constraint::MatchAll],
    }
}

/// Derives and renders the constraint string for a project
pub fn derive_rendered(project: &Project) -> Option<String> {
    format(&derive_constraints(project))
}
