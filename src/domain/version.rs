//! Composer-style version handling for Drupal releases
//!
//! Drupal contrib projects published before semantic versioning carry a
//! core-compatibility prefix (`7.x-1.9`, `8.x-2.0-beta1`). Everything that
//! orders or compares releases works on the normalized form, which drops
//! that prefix and fills in the missing patch component.

use crate::error::ParseError;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Core-compatibility prefixes used by legacy contrib version strings
const LEGACY_CORE_PREFIXES: [&str; 2] = ["7.x-", "8.x-"];

/// Composer version grammar restricted to what Drupal publishes
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:[._-]?(alpha|a|beta|b|rc|patch|pl|p)[._-]?(\d+)?)?(?:[._-]?(dev))?$",
    )
    .unwrap()
});

/// Converts a legacy `7.x-`/`8.x-` version string to its semantic form.
///
/// `7.x-1.9` becomes `1.9.0` and `8.x-1.9-beta1` becomes `1.9.0-beta1`.
/// Strings without a recognized prefix are returned unchanged. The result
/// is not validated; see [`is_normalizable`].
pub fn normalize(raw: &str) -> String {
    let Some(rest) = LEGACY_CORE_PREFIXES
        .iter()
        .find_map(|prefix| raw.strip_prefix(prefix))
    else {
        return raw.to_string();
    };

    let parts: Vec<&str> = rest.split('-').collect();
    if parts.len() == 2 {
        format!("{}.0-{}", parts[0], parts[1])
    } else {
        format!("{}.0", parts[0])
    }
}

/// Normalizes a supported branch prefix such as `8.x-1.` or `2.0.`
///
/// The trailing dot is replaced by a `.0` component before the legacy
/// prefix is removed, so `8.x-1.` becomes `1.0.0` and `2.` becomes `2.0`.
pub fn normalize_supported_branch(branch: &str) -> String {
    normalize(&format!("{}.0", branch.trim_end_matches('.')))
}

/// Returns true when the normalized form of `raw` is a usable, non-dev version
pub fn is_normalizable(raw: &str) -> bool {
    Version::parse(&normalize(raw))
        .map(|version| !version.is_dev())
        .unwrap_or(false)
}

/// Release stability, ordered from least to most stable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stability {
    Dev,
    Alpha,
    Beta,
    Rc,
    Stable,
    Patch,
}

impl Stability {
    fn from_modifier(modifier: &str) -> Self {
        match modifier.to_ascii_lowercase().as_str() {
            "alpha" | "a" => Stability::Alpha,
            "beta" | "b" => Stability::Beta,
            "rc" => Stability::Rc,
            "patch" | "pl" | "p" => Stability::Patch,
            _ => Stability::Stable,
        }
    }
}

/// A parsed version that keeps its original spelling for display
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    release: [u64; 3],
    precision: usize,
    stability: Stability,
    pre_number: u64,
}

impl Version {
    /// Parses a composer-style version string
    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let trimmed = value.trim();
        let caps = VERSION_RE
            .captures(trimmed)
            .ok_or_else(|| ParseError::invalid_version(value))?;

        let mut release = [0u64; 3];
        let mut precision = 0;
        for (slot, index) in release.iter_mut().zip(1..=3) {
            if let Some(m) = caps.get(index) {
                *slot = m
                    .as_str()
                    .parse()
                    .map_err(|_| ParseError::invalid_version(value))?;
                precision += 1;
            }
        }

        let pre_number = match caps.get(5) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| ParseError::invalid_version(value))?,
            None => 0,
        };

        // A trailing dev marker wins over any other modifier.
        let stability = if caps.get(6).is_some() {
            Stability::Dev
        } else {
            caps.get(4)
                .map(|m| Stability::from_modifier(m.as_str()))
                .unwrap_or(Stability::Stable)
        };

        Ok(Self {
            raw: trimmed.to_string(),
            release,
            precision,
            stability,
            pre_number,
        })
    }

    /// The version as originally written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn stability(&self) -> Stability {
        self.stability
    }

    pub fn is_dev(&self) -> bool {
        self.stability == Stability::Dev
    }

    pub fn is_stable(&self) -> bool {
        self.stability >= Stability::Stable
    }

    /// Numeric `[major, minor, patch]`, missing components are zero
    pub fn release(&self) -> [u64; 3] {
        self.release
    }

    /// Number of numeric components that were written out
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// The lowest version sharing this release number (`X.Y.Z-dev`)
    pub fn dev_floor(&self) -> Self {
        Self {
            raw: format!("{}-dev", self.raw),
            release: self.release,
            precision: self.precision,
            stability: Stability::Dev,
            pre_number: 0,
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.release
            .cmp(&other.release)
            .then(self.stability.cmp(&other.stability))
            .then(self.pre_number.cmp(&other.pre_number))
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
