//! Per-package build outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to one drupal.org project during a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// A conflict rule was derived
    Generated {
        /// Rendered composer constraint
        constraint: String,
    },
    /// Nothing could be derived; the manifest entry is left alone
    NoConstraint,
    /// Fetching or validating the release history failed
    Failed {
        /// Error message
        message: String,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Generated { constraint } => write!(f, "{}", constraint),
            Outcome::NoConstraint => write!(f, "no constraint"),
            Outcome::Failed { message } => write!(f, "failed: {}", message),
        }
    }
}

/// Outcome for a named project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageResult {
    /// drupal.org project name (without the `drupal/` vendor)
    pub project: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl PackageResult {
    pub fn generated(project: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            outcome: Outcome::Generated {
                constraint: constraint.into(),
            },
        }
    }

    pub fn no_constraint(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            outcome: Outcome::NoConstraint,
        }
    }

    pub fn failed(project: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            outcome: Outcome::Failed {
                message: message.into(),
            },
        }
    }

    /// The derived constraint, if any
    pub fn constraint(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Generated { constraint } => Some(constraint),
            _ => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self.outcome, Outcome::Generated { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}
