//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ValidationError: Malformed upstream records (aborts one package)
//! - ParseError: Version or constraint text that cannot be parsed
//! - RegistryError: Issues with drupal.org / updates.drupal.org communication
//! - ManifestError: Issues reading or writing the metapackage manifest
//! - ConfigError: Issues with CLI configuration

use std::path::PathBuf;
use thiserror::Error;

/// A record from the upstream feed did not have the expected shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or blank
    #[error("malformed data: field {field}: this value should not be blank")]
    MissingField { field: String },

    /// A field held a value outside its allowed set
    #[error("malformed data: field {field}: '{value}' is not one of {allowed}")]
    InvalidChoice {
        field: String,
        value: String,
        allowed: String,
    },

    /// The document as a whole could not be understood
    #[error("invalid document: {message}")]
    InvalidDocument { message: String },
}

/// Version or constraint text that does not follow the expected grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not a composer-style version
    #[error("invalid version string '{value}'")]
    InvalidVersion { value: String },

    /// Not a constraint produced by the formatter grammar
    #[error("invalid constraint '{value}': {message}")]
    InvalidConstraint { value: String, message: String },
}

/// Errors related to upstream communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Resource does not exist upstream
    #[error("'{url}' not found")]
    NotFound { url: String },

    /// Network request failed
    #[error("failed to fetch '{url}': {message}")]
    NetworkError { url: String, message: String },

    /// Rate limit exceeded
    #[error("rate limit exceeded while fetching '{url}'")]
    RateLimitExceeded { url: String },

    /// Response body could not be interpreted
    #[error("invalid response from '{url}': {message}")]
    InvalidResponse { url: String, message: String },

    /// Timeout
    #[error("timeout while fetching '{url}'")]
    Timeout { url: String },

    /// The response was fine but its content was malformed
    #[error("malformed data from '{url}': {source}")]
    Validation {
        url: String,
        #[source]
        source: ValidationError,
    },
}

/// Errors related to the metapackage manifest file
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unknown release category
    #[error("invalid release category '{value}': expected 'current' or 'legacy'")]
    InvalidCategory { value: String },

    /// Invalid concurrency value
    #[error("invalid concurrency '{value}': must be at least 1")]
    InvalidConcurrency { value: usize },

    /// Invalid path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },
}

impl ValidationError {
    /// Creates a new MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        ValidationError::MissingField {
            field: field.into(),
        }
    }

    /// Creates a new InvalidChoice error
    pub fn invalid_choice(
        field: impl Into<String>,
        value: impl Into<String>,
        allowed: &[&str],
    ) -> Self {
        ValidationError::InvalidChoice {
            field: field.into(),
            value: value.into(),
            allowed: allowed.join(", "),
        }
    }

    /// Creates a new InvalidDocument error
    pub fn invalid_document(message: impl Into<String>) -> Self {
        ValidationError::InvalidDocument {
            message: message.into(),
        }
    }
}

impl ParseError {
    /// Creates a new InvalidVersion error
    pub fn invalid_version(value: impl Into<String>) -> Self {
        ParseError::InvalidVersion {
            value: value.into(),
        }
    }

    /// Creates a new InvalidConstraint error
    pub fn invalid_constraint(value: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError::InvalidConstraint {
            value: value.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new NotFound error
    pub fn not_found(url: impl Into<String>) -> Self {
        RegistryError::NotFound { url: url.into() }
    }

    /// Creates a new NetworkError
    pub fn network_error(url: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::NetworkError {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(url: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::InvalidResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(url: impl Into<String>) -> Self {
        RegistryError::Timeout { url: url.into() }
    }

    /// Wraps a validation failure with the URL it came from
    pub fn validation(url: impl Into<String>, source: ValidationError) -> Self {
        RegistryError::Validation {
            url: url.into(),
            source,
        }
    }
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}
