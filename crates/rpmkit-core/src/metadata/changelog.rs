//! Changelog entries.

use std::time::SystemTime;

use super::tags::tag;
use super::unix_time;
use crate::Result;
use crate::RpmError;
use crate::section::Section;

/// One changelog entry, newest first in package order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    /// Author line, usually `Name <email> - version`.
    pub author: String,
    /// Free-form change text.
    pub text: String,
    /// Entry date.
    pub time: SystemTime,
}

/// Zips the changelog name, text and time arrays.
///
/// A section without any changelog tag has an empty changelog; one with
/// only some of them is damaged.
pub(crate) fn changelog(section: &Section) -> Result<Vec<ChangelogEntry>> {
    let present = [tag::CHANGELOG_NAME, tag::CHANGELOG_TEXT, tag::CHANGELOG_TIME]
        .map(|t| section.has(t));
    if present.iter().all(|p| !p) {
        return Ok(Vec::new());
    }

    let names = section.get_string_array(tag::CHANGELOG_NAME)?;
    let texts = section.get_string_array(tag::CHANGELOG_TEXT)?;
    let times = section.get_int32_array(tag::CHANGELOG_TIME)?;

    if texts.len() != names.len() {
        return Err(RpmError::FileListMismatch {
            field: "changelog text",
            expected: names.len(),
            actual: texts.len(),
        });
    }
    if times.len() != names.len() {
        return Err(RpmError::FileListMismatch {
            field: "changelog time",
            expected: names.len(),
            actual: times.len(),
        });
    }

    Ok(names
        .into_iter()
        .zip(texts)
        .zip(times)
        .map(|((author, text), time)| ChangelogEntry {
            author,
            text,
            time: unix_time(time),
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;
    use std::time::UNIX_EPOCH;

    use super::*;
    use crate::ReadConfig;
    use crate::section::decode;
    use crate::test_utils::SectionBuilder;

    fn decode_section(builder: SectionBuilder) -> Section {
        let bytes = builder.build();
        decode(&mut &bytes[..], &ReadConfig::default()).unwrap()
    }

    #[test]
    fn test_changelog_entries() {
        let section = decode_section(
            SectionBuilder::new()
                .int32(tag::CHANGELOG_TIME, &[1_600_000_000, 1_500_000_000])
                .string_array(tag::CHANGELOG_NAME, &["Alice - 1.1", "Bob - 1.0"])
                .string_array(tag::CHANGELOG_TEXT, &["- fix", "- initial"]),
        );
        let entries = changelog(&section).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].author, "Alice - 1.1");
        assert_eq!(entries[1].text, "- initial");
        assert_eq!(
            entries[0].time,
            UNIX_EPOCH + Duration::from_secs(1_600_000_000)
        );
    }

    #[test]
    fn test_no_changelog() {
        let section = decode_section(SectionBuilder::new().string(tag::NAME, "x"));
        assert!(changelog(&section).unwrap().is_empty());
    }

    #[test]
    fn test_partial_changelog() {
        let section =
            decode_section(SectionBuilder::new().string_array(tag::CHANGELOG_NAME, &["a"]));
        assert!(matches!(
            changelog(&section),
            Err(RpmError::TagNotFound(tag::CHANGELOG_TEXT))
        ));
    }

    #[test]
    fn test_changelog_length_mismatch() {
        let section = decode_section(
            SectionBuilder::new()
                .int32(tag::CHANGELOG_TIME, &[1])
                .string_array(tag::CHANGELOG_NAME, &["a", "b"])
                .string_array(tag::CHANGELOG_TEXT, &["x", "y"]),
        );
        assert!(matches!(
            changelog(&section),
            Err(RpmError::FileListMismatch {
                field: "changelog time",
                ..
            })
        ));
    }
}
