//! The `drupal-security-advisories` composer metapackage
//!
//! Keys other than `conflict` are kept as raw JSON so that anything this
//! tool does not manage survives a rebuild untouched.

use crate::error::ManifestError;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Composer name of the generated metapackage
pub const PACKAGE_NAME: &str = "drupal-composer/drupal-security-advisories";

const DESCRIPTION: &str =
    "Prevents installation of composer packages with known security vulnerabilities";
const LICENSE: &str = "GPL-2.0-or-later";
const PACKAGE_TYPE: &str = "metapackage";

/// Vendor prefix of every conflict entry
pub const VENDOR: &str = "drupal";

/// Core is published as both `drupal/drupal` and `drupal/core`
pub const CORE_PACKAGE: &str = "drupal/drupal";
pub const CORE_ALIAS: &str = "drupal/core";

/// In-memory composer.json of the metapackage
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerManifest {
    /// Every top-level key except `conflict`
    document: Map<String, Value>,
    conflict: BTreeMap<String, String>,
}

impl Default for ComposerManifest {
    fn default() -> Self {
        let mut document = Map::new();
        document.insert("name".to_string(), json!(PACKAGE_NAME));
        document.insert("description".to_string(), json!(DESCRIPTION));
        document.insert("type".to_string(), json!(PACKAGE_TYPE));
        document.insert("license".to_string(), json!(LICENSE));
        document.insert("extra".to_string(), json!({ "changed": 0 }));

        Self {
            document,
            conflict: BTreeMap::new(),
        }
    }
}

impl ComposerManifest {
    /// Loads the manifest at `path`, or the default document if it does not exist
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
        Self::parse(&content, path)
    }

    /// Parses manifest content; `path` is only used for error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

        let Value::Object(mut document) = value else {
            return Err(ManifestError::json_parse_error(
                path,
                "top-level value is not an object",
            ));
        };

        let conflict = match document.remove("conflict") {
            None => BTreeMap::new(),
            Some(Value::Object(entries)) => entries
                .into_iter()
                .map(|(package, rule)| match rule {
                    Value::String(rule) => Ok((package, rule)),
                    other => Err(ManifestError::json_parse_error(
                        path,
                        format!("conflict rule of '{}' is not a string: {}", package, other),
                    )),
                })
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(ManifestError::json_parse_error(
                    path,
                    "'conflict' is not an object",
                ))
            }
        };

        Ok(Self { document, conflict })
    }

    /// Composer package name for a drupal.org project
    pub fn package_name(project: &str) -> String {
        format!("{}/{}", VENDOR, project)
    }

    /// Stores the conflict rule of a drupal.org project, replacing any previous one
    pub fn set_conflict(&mut self, project: &str, constraint: impl Into<String>) {
        self.conflict
            .insert(Self::package_name(project), constraint.into());
    }

    /// Conflict rule of a composer package
    pub fn conflict(&self, package: &str) -> Option<&str> {
        self.conflict.get(package).map(String::as_str)
    }

    /// All conflict rules, sorted by package name
    pub fn conflicts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.conflict
            .iter()
            .map(|(package, rule)| (package.as_str(), rule.as_str()))
    }

    pub fn conflict_count(&self) -> usize {
        self.conflict.len()
    }

    /// Mirrors `drupal/drupal` onto `drupal/core`
    pub fn mirror_core_alias(&mut self) {
        if let Some(rule) = self.conflict.get(CORE_PACKAGE).cloned() {
            self.conflict.insert(CORE_ALIAS.to_string(), rule);
        }
    }

    /// Records the build time (Unix seconds) under `extra.changed`
    pub fn set_changed(&mut self, timestamp: i64) {
        match self.document.get_mut("extra") {
            Some(Value::Object(extra)) => {
                extra.insert("changed".to_string(), json!(timestamp));
            }
            _ => {
                self.document
                    .insert("extra".to_string(), json!({ "changed": timestamp }));
            }
        }
    }

    pub fn changed(&self) -> Option<i64> {
        self.document
            .get("extra")
            .and_then(|extra| extra.get("changed"))
            .and_then(Value::as_i64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// Renders the manifest as composer writes it: 4-space indent, trailing newline
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let mut document = self.document.clone();
        document.insert("conflict".to_string(), serde_json::to_value(&self.conflict)?);

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        document.serialize(&mut serializer)?;
        buffer.push(b'\n');
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("composer-9.x.json")
    }

    #[test]
    fn test_default_document() {
        let manifest = ComposerManifest::default();
        assert_eq!(manifest.get("name").unwrap(), PACKAGE_NAME);
        assert_eq!(manifest.get("type").unwrap(), "metapackage");
        assert_eq!(manifest.get("license").unwrap(), "GPL-2.0-or-later");
        assert_eq!(manifest.changed(), Some(0));
        assert_eq!(manifest.conflict_count(), 0);
    }

    #[test]
    fn test_set_conflict_replaces() {
        let mut manifest = ComposerManifest::default();
        manifest.set_conflict("views", "<1.0.0");
        manifest.set_conflict("views", "<2.0.0");
        assert_eq!(manifest.conflict("drupal/views"), Some("<2.0.0"));
        assert_eq!(manifest.conflict_count(), 1);
    }

    #[test]
    fn test_conflicts_are_sorted() {
        let mut manifest = ComposerManifest::default();
        manifest.set_conflict("webform", "<6.0.0");
        manifest.set_conflict("admin_toolbar", "<3.0.0");
        manifest.set_conflict("token", "*");
        let names: Vec<&str> = manifest.conflicts().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["drupal/admin_toolbar", "drupal/token", "drupal/webform"]);
    }

    #[test]
    fn test_core_alias_mirrors_core() {
        let mut manifest = ComposerManifest::default();
        manifest.set_conflict("drupal", "<9.4.7");
        manifest.mirror_core_alias();
        assert_eq!(manifest.conflict(CORE_ALIAS), Some("<9.4.7"));
    }

    #[test]
    fn test_core_alias_absent_without_core() {
        let mut manifest = ComposerManifest::default();
        manifest.set_conflict("views", "<1.0.0");
        manifest.mirror_core_alias();
        assert_eq!(manifest.conflict(CORE_ALIAS), None);
    }

    #[test]
    fn test_parse_preserves_unknown_keys() {
        let content = r#"{"name": "x", "minimum-stability": "dev", "conflict": {"drupal/views": "<1.0.0"}}"#;
        let manifest = ComposerManifest::parse(content, &path()).unwrap();
        assert_eq!(manifest.get("minimum-stability").unwrap(), "dev");
        assert_eq!(manifest.conflict("drupal/views"), Some("<1.0.0"));
    }

    #[test]
    fn test_parse_without_conflict() {
        let manifest = ComposerManifest::parse(r#"{"name": "x"}"#, &path()).unwrap();
        assert_eq!(manifest.conflict_count(), 0);
        assert!(manifest.to_json_string().unwrap().contains("\"conflict\": {}"));
    }

    #[test]
    fn test_parse_rejects_non_string_rule() {
        let content = r#"{"conflict": {"drupal/views": 1}}"#;
        assert!(matches!(
            ComposerManifest::parse(content, &path()),
            Err(ManifestError::JsonParseError { .. })
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ComposerManifest::parse("{invalid", &path()),
            Err(ManifestError::JsonParseError { .. })
        ));
        assert!(matches!(
            ComposerManifest::parse("[]", &path()),
            Err(ManifestError::JsonParseError { .. })
        ));
    }

    #[test]
    fn test_set_changed() {
        let mut manifest = ComposerManifest::default();
        manifest.set_changed(1_700_000_000);
        assert_eq!(manifest.changed(), Some(1_700_000_000));
    }

    #[test]
    fn test_to_json_string_format() {
        let mut manifest = ComposerManifest::default();
        manifest.set_conflict("views", ">=2.0.0,<2.0.1");
        let json = manifest.to_json_string().unwrap();
        assert!(json.ends_with("}\n"));
        assert!(json.contains("\n    \"name\": \"drupal-composer/drupal-security-advisories\""));
        assert!(json.contains("\"drupal/views\": \">=2.0.0,<2.0.1\""));
        assert!(!json.contains("\\/"));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let manifest = ComposerManifest::load(Path::new("/nonexistent/composer-9.x.json")).unwrap();
        assert_eq!(manifest, ComposerManifest::default());
    }
}
