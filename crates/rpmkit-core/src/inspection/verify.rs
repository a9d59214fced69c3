//! Cross-checks metadata file records against archive entries.

use std::io::Read;

use log::debug;
use log::warn;

use crate::Result;
use crate::RpmError;
use crate::formats::CpioEntry;
use crate::formats::CpioReader;
use crate::inspection::report::DigestAlgorithm;
use crate::inspection::report::DigestMismatch;
use crate::inspection::report::DigestStatus;
use crate::inspection::report::FieldMismatch;
use crate::inspection::report::VerifyResult;
use crate::metadata::FileRecord;
use crate::metadata::MetadataView;

/// Verifies every archived file against its metadata record.
///
/// Records with a declared size of zero have no archive entry and are
/// skipped. The remaining records are paired with archive entries by
/// position, in package order. Entries are compared as they are decoded;
/// only the current entry is held in memory.
///
/// # Errors
///
/// - [`RpmError::CountMismatch`] if the number of sized records differs
///   from the number of archive entries; no results are returned then
/// - [`RpmError::InvalidDigest`] if a declared digest is not valid hex
/// - any error from decoding the metadata or the archive
///
/// # Examples
///
/// ```
/// use rpmkit_core::CpioReader;
/// use rpmkit_core::Package;
/// use rpmkit_core::ReadConfig;
/// use rpmkit_core::inspection::verify_archive;
/// use rpmkit_core::test_utils::PackageBuilder;
/// use rpmkit_core::test_utils::TestFile;
///
/// let bytes = PackageBuilder::new("hello", "1.0", "1")
///     .file(TestFile::new("/usr/share/hello.txt", b"hello\n"))
///     .build();
/// let package = Package::from_reader(&bytes[..], &ReadConfig::default())?;
/// let mut archive = CpioReader::new(package.payload_reader()?);
///
/// let results = verify_archive(package.metadata(), &mut archive)?;
/// assert_eq!(results.len(), 1);
/// assert!(!results[0].has_mismatch());
/// # Ok::<(), rpmkit_core::RpmError>(())
/// ```
pub fn verify_archive<R: Read>(
    metadata: &MetadataView,
    archive: &mut CpioReader<R>,
) -> Result<Vec<VerifyResult>> {
    let records: Vec<FileRecord> = metadata
        .files()?
        .into_iter()
        .filter(|r| r.size != 0)
        .collect();

    let mut results = Vec::with_capacity(records.len());
    let mut archived = 0usize;
    let mut deferred: Option<RpmError> = None;

    while let Some(entry) = archive.next_entry()? {
        if let Some(record) = records.get(archived) {
            match compare(record, &entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    deferred.get_or_insert(e);
                }
            }
        }
        archived += 1;
    }

    debug!(
        "paired {} sized records with {archived} archive entries",
        records.len()
    );

    if records.len() != archived {
        return Err(RpmError::CountMismatch {
            declared: records.len(),
            archived,
        });
    }
    if let Some(e) = deferred {
        return Err(e);
    }
    Ok(results)
}

fn compare(record: &FileRecord, entry: &CpioEntry) -> Result<VerifyResult> {
    let size_error = if entry.is_empty() {
        None
    } else {
        FieldMismatch::compare(u64::from(record.size), entry.content.len() as u64)
    };

    #[allow(clippy::cast_possible_truncation)]
    let archived_mode = (entry.header.mode & 0xFFFF) as u32;
    let mode_error = FieldMismatch::compare(u32::from(record.mode), archived_mode);

    let mtime_error = FieldMismatch::compare(u64::from(record.mtime), entry.header.mtime);

    let digest = match record.digest() {
        None => DigestStatus::Absent,
        Some(hex_digest) => compare_digest(&record.path, hex_digest, entry)?,
    };

    Ok(VerifyResult {
        path: record.path.clone(),
        archived_path: entry.name.clone(),
        flags: record.flags,
        size_error,
        mode_error,
        digest,
        mtime_error,
    })
}

fn compare_digest(path: &str, hex_digest: &str, entry: &CpioEntry) -> Result<DigestStatus> {
    let expected = hex::decode(hex_digest).map_err(|e| RpmError::InvalidDigest {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    let Some(algorithm) = DigestAlgorithm::from_len(expected.len()) else {
        warn!(
            "{path}: {}-byte digest matches no known algorithm, skipping content check",
            expected.len()
        );
        return Ok(DigestStatus::Unverifiable {
            decoded_len: expected.len(),
        });
    };

    let actual = match algorithm {
        DigestAlgorithm::Md5 => entry.md5().to_vec(),
        DigestAlgorithm::Sha256 => entry.sha256().to_vec(),
    };

    if actual == expected {
        Ok(DigestStatus::Match(algorithm))
    } else {
        Ok(DigestStatus::Mismatch(DigestMismatch {
            algorithm,
            expected: hex_digest.to_ascii_lowercase(),
            actual: hex::encode(actual),
        }))
    }
}
