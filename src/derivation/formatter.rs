//! Rendering constraint lists as composer constraint strings

use crate::domain::Constraint;

/// Separator composer reads as logical OR
pub const DEFAULT_SEPARATOR: &str = "|";

/// Renders constraints joined with `separator`.
///
/// Returns `None` for an empty list; callers skip the package instead of
/// writing a blank rule.
pub fn format_with(constraints: &[Constraint], separator: &str) -> Option<String> {
    if constraints.is_empty() {
        return None;
    }

    Some(
        constraints
            .iter()
            .map(Constraint::to_string)
            .collect::<Vec<_>>()
            .join(separator),
    )
}

/// Renders constraints joined with `|`
pub fn format(constraints: &[Constraint]) -> Option<String> {
    format_with(constraints, DEFAULT_SEPARATOR)
}
