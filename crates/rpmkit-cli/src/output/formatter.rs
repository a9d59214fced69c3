//! Output formatter trait for CLI results.

use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use rpmkit_core::ChangelogEntry;
use rpmkit_core::FileRecord;
use rpmkit_core::MetadataView;
use rpmkit_core::SignatureReport;
use rpmkit_core::VerificationReport;
use serde::Serialize;
use std::path::Path;
use std::time::SystemTime;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format package metadata
    fn format_info(&self, package: &Path, info: &PackageInfo) -> Result<()>;

    /// Format a file listing
    fn format_files(&self, package: &Path, files: &[FileRecord], long: bool) -> Result<()>;

    /// Format a changelog
    fn format_changelog(&self, package: &Path, entries: &[ChangelogEntry]) -> Result<()>;

    /// Format a verification report
    fn format_verification_report(&self, package: &Path, report: &VerificationReport)
    -> Result<()>;

    /// Format a signature digest report
    fn format_signature_report(&self, package: &Path, report: &SignatureReport) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);

    /// Format success message
    fn format_success(&self, message: &str);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Package metadata as shown by `info`.
#[derive(Debug, Serialize)]
pub struct PackageInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epoch: Option<u32>,
    pub version: String,
    pub release: String,
    pub arch: String,
    pub nevra: String,
    pub group: String,
    pub size: u32,
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_rpm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packager: Option<String>,
    pub payload_compressor: String,
    pub summary: String,
    pub description: String,
}

impl PackageInfo {
    /// Collects the displayed fields from a metadata section.
    pub fn from_metadata(meta: &MetadataView) -> rpmkit_core::Result<Self> {
        Ok(Self {
            name: meta.name()?,
            epoch: meta.epoch()?,
            version: meta.version()?,
            release: meta.release()?,
            arch: meta.arch()?,
            nevra: meta.nevra()?,
            group: meta.group()?,
            size: meta.size()?,
            license: meta.license()?,
            build_date: meta.build_time()?.map(format_timestamp),
            build_host: meta.build_host()?,
            source_rpm: meta.source_rpm()?,
            url: meta.url()?,
            vendor: meta.vendor()?,
            packager: meta.packager()?,
            payload_compressor: meta.payload_compressor()?,
            summary: meta.summary()?,
            description: meta.description()?,
        })
    }
}

/// Renders a timestamp as UTC date and time.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

/// Renders a timestamp as a changelog date, e.g. `Tue Nov 14 2023`.
pub fn format_changelog_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%a %b %d %Y").to_string()
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, package: &Path, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            package: Some(package.display().to_string()),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            package: None,
            data: None,
            error: Some(error.into()),
        }
    }
}
