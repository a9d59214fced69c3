//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::PackageInfo;
use super::formatter::format_timestamp;
use anyhow::Result;
use rpmkit_core::ChangelogEntry;
use rpmkit_core::DigestStatus;
use rpmkit_core::FileRecord;
use rpmkit_core::SignatureReport;
use rpmkit_core::VerificationReport;
use rpmkit_core::inspection::CheckOutcome;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use std::time::Duration;
use std::time::UNIX_EPOCH;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct FileOutput<'a> {
    path: &'a str,
    size: u32,
    mode: u16,
    mtime: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    digest: &'a str,
    flags: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    link_to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
enum CheckOutput<'a> {
    Absent,
    Ok,
    Mismatch { expected: &'a str, actual: &'a str },
}

impl<'a> From<&'a CheckOutcome> for CheckOutput<'a> {
    fn from(outcome: &'a CheckOutcome) -> Self {
        match outcome {
            CheckOutcome::Absent => Self::Absent,
            CheckOutcome::Ok => Self::Ok,
            CheckOutcome::Mismatch { expected, actual } => Self::Mismatch { expected, actual },
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_info(&self, package: &Path, info: &PackageInfo) -> Result<()> {
        Self::output(&JsonOutput::success("info", package, info))
    }

    fn format_files(&self, package: &Path, files: &[FileRecord], _long: bool) -> Result<()> {
        let data: Vec<FileOutput<'_>> = files
            .iter()
            .map(|f| FileOutput {
                path: &f.path,
                size: f.size,
                mode: f.mode,
                mtime: f.mtime,
                digest: &f.digest_hex,
                flags: f.flags.bits(),
                link_to: &f.link_to,
                user: f.user.as_deref(),
                group: f.group.as_deref(),
            })
            .collect();
        Self::output(&JsonOutput::success("list", package, data))
    }

    fn format_changelog(&self, package: &Path, entries: &[ChangelogEntry]) -> Result<()> {
        #[derive(Serialize)]
        struct EntryOutput<'a> {
            date: String,
            author: &'a str,
            text: &'a str,
        }

        let data: Vec<EntryOutput<'_>> = entries
            .iter()
            .map(|e| EntryOutput {
                date: format_timestamp(e.time),
                author: &e.author,
                text: &e.text,
            })
            .collect();
        Self::output(&JsonOutput::success("changelog", package, data))
    }

    fn format_verification_report(
        &self,
        package: &Path,
        report: &VerificationReport,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct ResultOutput<'a> {
            path: &'a str,
            archived_path: &'a str,
            flags: String,
            digest: &'static str,
        }

        #[derive(Serialize)]
        struct VerifyOutput<'a> {
            status: String,
            files_checked: usize,
            mismatched_files: usize,
            unverifiable_digests: usize,
            results: Vec<ResultOutput<'a>>,
        }

        let results = report
            .results
            .iter()
            .map(|r| ResultOutput {
                path: &r.path,
                archived_path: &r.archived_path,
                flags: r.flag_string(),
                digest: match r.digest {
                    DigestStatus::Absent => "absent",
                    DigestStatus::Match(_) => "match",
                    DigestStatus::Mismatch(_) => "mismatch",
                    DigestStatus::Unverifiable { .. } => "unverifiable",
                },
            })
            .collect();

        let data = VerifyOutput {
            status: report.status.to_string().to_lowercase(),
            files_checked: report.files_checked,
            mismatched_files: report.mismatched_files,
            unverifiable_digests: report.unverifiable_digests,
            results,
        };
        Self::output(&JsonOutput::success("verify", package, data))
    }

    fn format_signature_report(&self, package: &Path, report: &SignatureReport) -> Result<()> {
        #[derive(Serialize)]
        struct SignatureOutput<'a> {
            ok: bool,
            size: CheckOutput<'a>,
            md5: CheckOutput<'a>,
            has_header_signature: bool,
            has_payload_signature: bool,
        }

        let data = SignatureOutput {
            ok: report.is_ok(),
            size: (&report.size).into(),
            md5: (&report.md5).into(),
            has_header_signature: report.has_header_signature,
            has_payload_signature: report.has_payload_signature,
        };
        Self::output(&JsonOutput::success("checksig", package, data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("error", format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_success(&self, _message: &str) {}

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let output = JsonOutput {
            operation: "warning".to_string(),
            status: super::formatter::Status::Success,
            package: None,
            data: Some(WarningData { message }),
            error: None,
        };
        let _ = Self::output(&output);
    }
}
