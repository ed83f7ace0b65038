//! Chronological release history and security epochs
//!
//! The upstream feed lists releases newest first. The epoch walk needs
//! them oldest first, so [`ReleaseTimeline`] sorts them explicitly instead
//! of relying on feed order.

use crate::domain::{is_normalizable, Project, Version};

/// A release reduced to what the epoch walk looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub version: Version,
    pub is_security_release: bool,
    pub is_insecure: bool,
}

/// Normalizable, non-dev releases of a project, oldest first
#[derive(Debug, Clone, Default)]
pub struct ReleaseTimeline {
    entries: Vec<TimelineEntry>,
}

impl ReleaseTimeline {
    /// Builds the timeline, dropping releases that do not normalize to a
    /// stable-or-prerelease version
    pub fn from_project(project: &Project) -> Self {
        let mut entries: Vec<TimelineEntry> = project
            .releases()
            .iter()
            .filter(|release| is_normalizable(release.version()))
            .filter_map(|release| {
                let version = Version::parse(release.semantic_version()).ok()?;
                let class = release.classification();
                Some(TimelineEntry {
                    version,
                    is_security_release: class.is_security_release,
                    is_insecure: class.is_insecure,
                })
            })
            .collect();

        // Project construction already merged versions that compare equal (2.0 / 2.0.0).
        entries.sort_by(|a, b| a.version.cmp(&b.version));
        Self { entries }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent release of the whole history
    pub fn newest(&self) -> Option<&Version> {
        self.entries.last().map(|entry| &entry.version)
    }

    /// True if some insecure release sorts above `version`
    pub fn has_insecure_after(&self, version: &Version) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.is_insecure && entry.version > *version)
    }

    /// Groups the history into security epochs
    pub fn epochs(&self) -> EpochWalk {
        EpochWalk::walk(&self.entries)
    }
}

/// Outcome of walking a timeline oldest to newest
#[derive(Debug, Clone, Default)]
pub struct EpochWalk {
    /// Non-insecure versions filed per epoch, oldest epoch first
    pub groups: Vec<Vec<Version>>,
    /// Newest insecure release; `None` when nothing was ever marked insecure
    pub last_insecure: Option<Version>,
    pub latest_security_fix: Option<Version>,
}

impl EpochWalk {
    fn walk(entries: &[TimelineEntry]) -> Self {
        let mut walk = EpochWalk {
            groups: vec![Vec::new()],
            ..Default::default()
        };
        let mut previous: Option<&TimelineEntry> = None;

        for entry in entries {
            let after_insecure = previous.is_some_and(|p| p.is_insecure) && !entry.is_insecure;
            if entry.is_security_release || after_insecure {
                walk.groups.push(Vec::new());
            }

            if entry.is_insecure {
                walk.last_insecure = Some(entry.version.clone());
            } else if let Some(group) = walk.groups.last_mut() {
                group.push(entry.version.clone());
            }

            if entry.is_security_release {
                walk.latest_security_fix = Some(entry.version.clone());
            }

            previous = Some(entry);
        }

        walk
    }

    /// Epochs that received at least one version, oldest first
    pub fn non_empty_groups(&self) -> impl DoubleEndedIterator<Item = &[Version]> {
        self.groups
            .iter()
            .filter(|group| !group.is_empty())
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProjectStatus, Release};

    fn project(releases: &[(&str, &str)]) -> Project {
        let releases = releases
            .iter()
            .map(|(version, label)| Release::new(*version, [*label]).unwrap());
        Project::new(ProjectStatus::Published, ["8.x-1."], releases)
    }

    fn versions(group: &[Version]) -> Vec<String> {
        group.iter().map(Version::to_string).collect()
    }

    #[test]
    fn test_timeline_is_oldest_first() {
        let timeline = ReleaseTimeline::from_project(&project(&[
            ("8.x-1.2", "Bug fixes"),
            ("8.x-1.10", "Bug fixes"),
            ("8.x-1.1-beta1", "Bug fixes"),
            ("8.x-1.1", "Bug fixes"),
        ]));
        let order: Vec<String> = timeline
            .entries()
            .iter()
            .map(|e| e.version.to_string())
            .collect();
        assert_eq!(order, vec!["1.1.0-beta1", "1.1.0", "1.2.0", "1.10.0"]);
        assert_eq!(timeline.newest().unwrap().to_string(), "1.10.0");
    }

    #[test]
    fn test_timeline_drops_dev_and_garbage() {
        let timeline = ReleaseTimeline::from_project(&project(&[
            ("8.x-1.x-dev", "Bug fixes"),
            ("8.x-1.0-unstable1", "Bug fixes"),
            ("8.x-1.0", "Bug fixes"),
        ]));
        assert_eq!(timeline.entries().len(), 1);
    }

    #[test]
    fn test_epochs_split_on_security_release() {
        let walk = ReleaseTimeline::from_project(&project(&[
            ("2.0.1", "Security update"),
            ("2.0.0", "Insecure"),
            ("8.x-1.2", "Bug fixes"),
            ("8.x-1.1", "Bug fixes"),
        ]))
        .epochs();

        let groups: Vec<Vec<String>> = walk.non_empty_groups().map(versions).collect();
        assert_eq!(groups, vec![vec!["1.1.0", "1.2.0"], vec!["2.0.1"]]);
        assert_eq!(walk.last_insecure.unwrap().to_string(), "2.0.0");
        assert_eq!(walk.latest_security_fix.unwrap().to_string(), "2.0.1");
    }

    #[test]
    fn test_epochs_split_after_untagged_fix() {
        let walk = ReleaseTimeline::from_project(&project(&[
            ("8.x-1.13-alpha1", "Bug fixes"),
            ("8.x-1.11", "Insecure"),
        ]))
        .epochs();

        let groups: Vec<Vec<String>> = walk.non_empty_groups().map(versions).collect();
        assert_eq!(groups, vec![vec!["1.13.0-alpha1"]]);
        assert!(walk.latest_security_fix.is_none());
    }

    #[test]
    fn test_latest_security_fix_is_newest() {
        let walk = ReleaseTimeline::from_project(&project(&[
            ("3.0.2", "Security update"),
            ("3.0.1", "Security update"),
            ("3.0.0", "Bug fixes"),
        ]))
        .epochs();
        assert_eq!(walk.latest_security_fix.as_ref().unwrap().to_string(), "3.0.2");
        assert_eq!(walk.non_empty_groups().count(), 3);
    }

    #[test]
    fn test_has_insecure_after() {
        let timeline = ReleaseTimeline::from_project(&project(&[
            ("8.x-1.2", "Insecure"),
            ("8.x-1.1", "Bug fixes"),
        ]));
        assert!(timeline.epochs().last_insecure.is_some());
        assert!(timeline.has_insecure_after(&Version::parse("1.0.0").unwrap()));
        assert!(!timeline.has_insecure_after(&Version::parse("1.2.0").unwrap()));
    }
}
