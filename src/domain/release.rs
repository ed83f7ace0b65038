//! Release records and their security classification

use super::version::normalize;
use crate::error::ValidationError;
use std::collections::BTreeSet;
use std::fmt;

/// Publication states accepted for a release record
const RELEASE_STATUSES: [&str; 2] = ["published", "unpublished"];

/// Release type labels the classifier understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseType {
    /// Release fixes a security issue
    SecurityUpdate,
    /// Release has a known vulnerability
    Insecure,
    /// Release line is no longer supported
    Unsupported,
}

impl ReleaseType {
    /// The label as published upstream
    pub fn label(&self) -> &'static str {
        match self {
            ReleaseType::SecurityUpdate => "Security update",
            ReleaseType::Insecure => "Insecure",
            ReleaseType::Unsupported => "Unsupported",
        }
    }

    /// Maps an upstream label to a release type (exact, case-sensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        [
            ReleaseType::SecurityUpdate,
            ReleaseType::Insecure,
            ReleaseType::Unsupported,
        ]
        .into_iter()
        .find(|t| t.label() == label)
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Security predicates derived from a release's labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_security_release: bool,
    pub is_insecure: bool,
    pub is_unsupported: bool,
}

impl Classification {
    /// True when none of the recognized labels is present
    pub fn is_ordinary(&self) -> bool {
        !(self.is_security_release || self.is_insecure || self.is_unsupported)
    }
}

/// Classifies a release from its labels; unknown labels are ignored
pub fn classify<'a, I>(labels: I) -> Classification
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .filter_map(ReleaseType::from_label)
        .fold(Classification::default(), |mut acc, release_type| {
            match release_type {
                ReleaseType::SecurityUpdate => acc.is_security_release = true,
                ReleaseType::Insecure => acc.is_insecure = true,
                ReleaseType::Unsupported => acc.is_unsupported = true,
            }
            acc
        })
}

/// Unvalidated release data as read from the release-history feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub version: Option<String>,
    pub status: Option<String>,
    pub labels: Vec<String>,
}

/// One published or unpublished revision of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    version: String,
    semantic_version: String,
    labels: BTreeSet<String>,
}

impl Release {
    /// Creates a release, rejecting a blank version
    pub fn new<I, S>(version: impl Into<String>, labels: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(ValidationError::missing_field("[version]"));
        }

        Ok(Self {
            semantic_version: normalize(&version),
            version,
            labels: labels.into_iter().map(Into::into).collect(),
        })
    }

    /// Validates a feed record and builds the release from it
    pub fn from_record(record: ReleaseRecord) -> Result<Self, ValidationError> {
        let status = record
            .status
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::missing_field("[status]"))?;
        if !RELEASE_STATUSES.contains(&status.as_str()) {
            return Err(ValidationError::invalid_choice(
                "[status]",
                status,
                &RELEASE_STATUSES,
            ));
        }

        let version = record
            .version
            .ok_or_else(|| ValidationError::missing_field("[version]"))?;

        Self::new(version, record.labels)
    }

    /// The version as published upstream
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The normalized version used for ordering
    pub fn semantic_version(&self) -> &str {
        &self.semantic_version
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn classification(&self) -> Classification {
        classify(self.labels())
    }

    pub fn is_security_release(&self) -> bool {
        self.classification().is_security_release
    }

    pub fn is_insecure(&self) -> bool {
        self.classification().is_insecure
    }

    pub fn is_unsupported(&self) -> bool {
        self.classification().is_unsupported
    }

    /// Takes over a later record of the same version, keeping the labels
    /// of both records
    pub fn supersede(&mut self, later: Release) {
        let earlier = std::mem::replace(self, later);
        self.labels.extend(earlier.labels);
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)?;
        if !self.labels.is_empty() {
            let labels: Vec<&str> = self.labels().collect();
            write!(f, " [{}]", labels.join(", "))?;
        }
        Ok(())
    }
}
