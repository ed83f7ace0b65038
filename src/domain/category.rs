//! Release channels of drupal.org

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which Drupal generation to build the metapackage for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseCategory {
    /// Drupal 8 and later
    #[default]
    Current,
    /// Drupal 7
    Legacy,
}

impl ReleaseCategory {
    /// Path segment of the release-history endpoint
    pub fn history_endpoint(&self) -> &'static str {
        match self {
            ReleaseCategory::Current => "current",
            ReleaseCategory::Legacy => "7.x",
        }
    }

    /// Value of `field_release_category` in the drupal.org API
    pub fn api_category(&self) -> &'static str {
        match self {
            ReleaseCategory::Current => "current",
            ReleaseCategory::Legacy => "legacy",
        }
    }

    /// File name of the generated manifest inside the build directory
    pub fn output_filename(&self) -> &'static str {
        match self {
            ReleaseCategory::Current => "composer-9.x.json",
            ReleaseCategory::Legacy => "composer-7.x.json",
        }
    }

    /// Composer repository serving this generation's packages
    pub fn composer_repository(&self) -> &'static str {
        match self {
            ReleaseCategory::Current => "https://packages.drupal.org/8/",
            ReleaseCategory::Legacy => "https://packages.drupal.org/7/",
        }
    }
}

impl FromStr for ReleaseCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(ReleaseCategory::Current),
            "legacy" | "7.x" => Ok(ReleaseCategory::Legacy),
            other => Err(ConfigError::InvalidCategory {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ReleaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_category())
    }
}
