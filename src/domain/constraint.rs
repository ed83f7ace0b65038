//! Version-range constraints in composer `conflict` notation
//!
//! A constraint is one of:
//! - `*` (matches every version)
//! - a simple bound: `<1.2.0`, `<=1.2.0`, `>1.2.0`, `>=1.2.0`
//! - an interval of two bounds joined with `,` (logical AND): `>=1.0.0,<1.2.0`
//!
//! A list of constraints joined with `|` is a logical OR.

use super::version::Version;
use crate::error::ParseError;
use std::fmt;
use std::str::FromStr;

/// Token rendered for [`Constraint::MatchAll`]
pub const MATCH_ALL_TOKEN: &str = "*";

/// Comparison operator of a bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }

    /// True for `<` and `<=`
    pub fn is_upper(&self) -> bool {
        matches!(self, Operator::Lt | Operator::Le)
    }

    /// Splits a leading operator off `s`
    fn split(s: &str) -> Option<(Self, &str)> {
        // Two-character operators first.
        [Operator::Le, Operator::Ge, Operator::Lt, Operator::Gt]
            .into_iter()
            .find_map(|op| s.strip_prefix(op.as_str()).map(|rest| (op, rest)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single comparison against a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub operator: Operator,
    pub version: Version,
}

impl Bound {
    pub fn new(operator: Operator, version: Version) -> Self {
        Self { operator, version }
    }

    pub fn less_than(version: Version) -> Self {
        Self::new(Operator::Lt, version)
    }

    pub fn less_or_equal(version: Version) -> Self {
        Self::new(Operator::Le, version)
    }

    pub fn greater_than(version: Version) -> Self {
        Self::new(Operator::Gt, version)
    }

    pub fn greater_or_equal(version: Version) -> Self {
        Self::new(Operator::Ge, version)
    }

    /// Tests `version` against the bound with composer semantics.
    ///
    /// `<V` and `>=V` with a stable `V` compare against `V-dev`, so
    /// pre-releases of `V` fall below the bound.
    pub fn matches(&self, version: &Version) -> bool {
        let floored;
        let target = match self.operator {
            Operator::Lt | Operator::Ge if self.version.is_stable() => {
                floored = self.version.dev_floor();
                &floored
            }
            _ => &self.version,
        };

        match self.operator {
            Operator::Lt => version < target,
            Operator::Le => version <= target,
            Operator::Gt => version > target,
            Operator::Ge => version >= target,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

impl FromStr for Bound {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (operator, rest) = Operator::split(s.trim())
            .ok_or_else(|| ParseError::invalid_constraint(s, "missing comparison operator"))?;
        let version = Version::parse(rest)
            .map_err(|_| ParseError::invalid_constraint(s, "invalid version"))?;
        Ok(Self::new(operator, version))
    }
}

/// A range exclusion rule over versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Every version
    MatchAll,
    /// A single bound
    Bound(Bound),
    /// Both bounds must hold
    Interval { lower: Bound, upper: Bound },
}

impl Constraint {
    pub fn less_than(version: Version) -> Self {
        Constraint::Bound(Bound::less_than(version))
    }

    pub fn less_or_equal(version: Version) -> Self {
        Constraint::Bound(Bound::less_or_equal(version))
    }

    pub fn interval(lower: Bound, upper: Bound) -> Self {
        Constraint::Interval { lower, upper }
    }

    /// True when the version falls inside the excluded range
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Constraint::MatchAll => true,
            Constraint::Bound(bound) => bound.matches(version),
            Constraint::Interval { lower, upper } => {
                lower.matches(version) && upper.matches(version)
            }
        }
    }

    /// A lone `<`/`<=` bound with nothing paired below it
    pub fn is_upper_bound_only(&self) -> bool {
        matches!(self, Constraint::Bound(bound) if bound.operator.is_upper())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::MatchAll => write!(f, "{}", MATCH_ALL_TOKEN),
            Constraint::Bound(bound) => write!(f, "{}", bound),
            Constraint::Interval { lower, upper } => write!(f, "{},{}", lower, upper),
        }
    }
}

impl FromStr for Constraint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == MATCH_ALL_TOKEN {
            return Ok(Constraint::MatchAll);
        }

        let parts: Vec<&str> = s.split(',').collect();
        match parts.as_slice() {
            [single] => Ok(Constraint::Bound(single.parse()?)),
            [lower, upper] => Ok(Constraint::interval(lower.parse()?, upper.parse()?)),
            _ => Err(ParseError::invalid_constraint(
                s,
                "expected at most two comma-separated bounds",
            )),
        }
    }
}

/// Parses a `|`-separated list of constraints
pub fn parse_constraints(s: &str) -> Result<Vec<Constraint>, ParseError> {
    if s.trim().is_empty() {
        return Err(ParseError::invalid_constraint(s, "empty constraint"));
    }
    s.split('|').map(str::parse).collect()
}

/// True when any constraint in the list matches the version
pub fn any_matches(constraints: &[Constraint], version: &Version) -> bool {
    constraints.iter().any(|c| c.matches(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn c(s: &str) -> Constraint {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_simple_bounds() {
        assert_eq!(c("<1.0.0"), Constraint::less_than(v("1.0.0")));
        assert_eq!(c("<=1.26.0"), Constraint::less_or_equal(v("1.26.0")));
        assert_eq!(
            c(">2.0.0"),
            Constraint::Bound(Bound::greater_than(v("2.0.0")))
        );
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(
            c(">=2.0.0,<2.0.1"),
            Constraint::interval(Bound::greater_or_equal(v("2.0.0")), Bound::less_than(v("2.0.1")))
        );
    }

    #[test]
    fn test_parse_match_all() {
        assert_eq!(c("*"), Constraint::MatchAll);
    }

    #[test]
    fn test_parse_errors() {
        assert!("1.0.0".parse::<Constraint>().is_err());
        assert!("=>1.0.0".parse::<Constraint>().is_err());
        assert!("<abc".parse::<Constraint>().is_err());
        assert!(">1,<2,<3".parse::<Constraint>().is_err());
        assert!(parse_constraints("").is_err());
    }

    #[test]
    fn test_parse_constraints_list() {
        let list = parse_constraints("<1.0.0|>=2.0.0,<2.0.1").unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].is_upper_bound_only());
        assert!(!list[1].is_upper_bound_only());
    }

    #[test]
    fn test_display() {
        assert_eq!(c(">=1.0.0,<1.11.0-alpha5").to_string(), ">=1.0.0,<1.11.0-alpha5");
        assert_eq!(Constraint::MatchAll.to_string(), "*");
        assert_eq!(c("<=1.26.0").to_string(), "<=1.26.0");
    }

    #[test]
    fn test_stable_upper_bound_excludes_its_prereleases() {
        let constraint = c(">=2.0.0,<2.8.0");
        assert!(constraint.matches(&v("2.7.0-alpha1")));
        assert!(constraint.matches(&v("2.6.0-rc1")));
        assert!(!constraint.matches(&v("2.8-beta1")));
        assert!(!constraint.matches(&v("2.8-rc1")));
        assert!(!constraint.matches(&v("2.9")));
    }

    #[test]
    fn test_stable_lower_bound_includes_its_prereleases() {
        assert!(c(">=11.7.0,<11.7.2").matches(&v("11.7.1-beta1")));
        assert!(c(">=11.7.0").matches(&v("11.7.0-alpha1")));
        assert!(!c(">11.7.0").matches(&v("11.7.0")));
    }

    #[test]
    fn test_prerelease_upper_bound_is_exact() {
        let constraint = c("<1.13.0-alpha1");
        assert!(constraint.matches(&v("1.12-rc1")));
        assert!(!constraint.matches(&v("1.13-alpha1")));
        assert!(!constraint.matches(&v("1.13-alpha2")));
    }

    #[test]
    fn test_less_or_equal_is_inclusive() {
        assert!(c("<=1.26.0").matches(&v("1.26.0")));
        assert!(c("<=1.26.0").matches(&v("1.1.0")));
        assert!(!c("<=1.26.0").matches(&v("1.26.1")));
    }

    #[test]
    fn test_match_all_matches_everything() {
        assert!(Constraint::MatchAll.matches(&v("0.0.1")));
        assert!(Constraint::MatchAll.matches(&v("99.0.0")));
    }

    #[test]
    fn test_any_matches() {
        let list = parse_constraints("<1.0.0|>=2.0.0,<2.0.1").unwrap();
        assert!(any_matches(&list, &v("0.9.0")));
        assert!(any_matches(&list, &v("2.0.0")));
        assert!(!any_matches(&list, &v("1.5.0")));
        assert!(!any_matches(&list, &v("2.0.1")));
    }
}
