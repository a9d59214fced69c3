//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use super::formatter::PackageInfo;
use super::formatter::format_changelog_date;
use super::formatter::format_timestamp;
use anyhow::Result;
use console::Term;
use console::style;
use rpmkit_core::ChangelogEntry;
use rpmkit_core::DigestStatus;
use rpmkit_core::FileKind;
use rpmkit_core::FileRecord;
use rpmkit_core::SignatureReport;
use rpmkit_core::VerificationReport;
use rpmkit_core::VerificationStatus;
use rpmkit_core::VerifyResult;
use std::path::Path;
use std::time::Duration;
use std::time::UNIX_EPOCH;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn field(&self, label: &str, value: &str) {
        let label = format!("{label:<12}:");
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {value}", style(label).bold()));
        } else {
            let _ = self.term.write_line(&format!("{label} {value}"));
        }
    }

    fn long_line(file: &FileRecord) -> String {
        let mtime = format_timestamp(UNIX_EPOCH + Duration::from_secs(u64::from(file.mtime)));
        let mut line = format!(
            "{} {:<8} {:<8} {:>10}  {}  {}",
            FileKind::mode_string(u32::from(file.mode)),
            file.user.as_deref().unwrap_or("-"),
            file.group.as_deref().unwrap_or("-"),
            file.size,
            mtime,
            file.path
        );
        if file.kind() == FileKind::Symlink && !file.link_to.is_empty() {
            line.push_str(" -> ");
            line.push_str(&file.link_to);
        }
        line
    }

    fn result_line(&self, result: &VerifyResult) -> String {
        let flags = result.flag_string();
        let flags = if self.use_colors && result.has_mismatch() {
            style(flags).red().bold().to_string()
        } else {
            flags
        };
        format!("{flags}  {} {}", result.flags.marker(), result.path)
    }

    fn result_details(&self, result: &VerifyResult) {
        if let Some(m) = &result.size_error {
            let _ = self.term.write_line(&format!(
                "      size: expected {}, archived {}",
                m.expected, m.actual
            ));
        }
        if let Some(m) = &result.mode_error {
            let _ = self.term.write_line(&format!(
                "      mode: expected {:o}, archived {:o}",
                m.expected, m.actual
            ));
        }
        if let Some(m) = result.digest_error() {
            let _ = self.term.write_line(&format!(
                "      {}: expected {}, archived {}",
                m.algorithm.name(),
                m.expected,
                m.actual
            ));
        }
        if let Some(m) = &result.mtime_error {
            let _ = self.term.write_line(&format!(
                "      mtime: expected {}, archived {}",
                m.expected, m.actual
            ));
        }
        if let DigestStatus::Unverifiable { decoded_len } = result.digest {
            let _ = self.term.write_line(&format!(
                "      digest: {decoded_len}-byte digest not verifiable"
            ));
        }
        if !result.paths_agree() {
            let _ = self
                .term
                .write_line(&format!("      archived as {}", result.archived_path));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_info(&self, _package: &Path, info: &PackageInfo) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.field("Name", &info.name);
        if let Some(epoch) = info.epoch {
            self.field("Epoch", &epoch.to_string());
        }
        self.field("Version", &info.version);
        self.field("Release", &info.release);
        self.field("Architecture", &info.arch);
        self.field("Group", &info.group);
        self.field("Size", &Self::format_size(u64::from(info.size)));
        self.field("License", &info.license);
        if let Some(date) = &info.build_date {
            self.field("Build Date", date);
        }
        if let Some(host) = &info.build_host {
            self.field("Build Host", host);
        }
        if let Some(source) = &info.source_rpm {
            self.field("Source RPM", source);
        }
        if let Some(url) = &info.url {
            self.field("URL", url);
        }
        if self.verbose {
            if let Some(vendor) = &info.vendor {
                self.field("Vendor", vendor);
            }
            if let Some(packager) = &info.packager {
                self.field("Packager", packager);
            }
            self.field("Compressor", &info.payload_compressor);
        }
        self.field("Summary", &info.summary);
        self.field("Description", "");
        let _ = self.term.write_line(&info.description);
        let _ = self.term.write_line("");

        Ok(())
    }

    fn format_files(&self, _package: &Path, files: &[FileRecord], long: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for file in files {
            if long {
                let _ = self.term.write_line(&Self::long_line(file));
            } else {
                let _ = self.term.write_line(&file.path);
            }
        }

        Ok(())
    }

    fn format_changelog(&self, _package: &Path, entries: &[ChangelogEntry]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in entries {
            let heading = format!("* {} {}", format_changelog_date(entry.time), entry.author);
            if self.use_colors {
                let _ = self.term.write_line(&style(heading).bold().to_string());
            } else {
                let _ = self.term.write_line(&heading);
            }
            let _ = self.term.write_line(&entry.text);
            let _ = self.term.write_line("");
        }

        Ok(())
    }

    fn format_verification_report(
        &self,
        package: &Path,
        report: &VerificationReport,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for result in &report.results {
            let _ = self.term.write_line(&self.result_line(result));
            if self.verbose {
                self.result_details(result);
            }
        }

        let status = if self.use_colors {
            match report.status {
                VerificationStatus::Pass => style("PASS").green().bold(),
                VerificationStatus::Warning => style("WARNING").yellow().bold(),
                VerificationStatus::Fail => style("FAIL").red().bold(),
            }
            .to_string()
        } else {
            report.status.to_string()
        };
        let _ = self.term.write_line(&format!(
            "{}: {status} ({} files checked, {} mismatched, {} unverifiable)",
            package.display(),
            report.files_checked,
            report.mismatched_files,
            report.unverifiable_digests
        ));

        Ok(())
    }

    fn format_signature_report(&self, package: &Path, report: &SignatureReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let verdict = if report.is_ok() { "digests OK" } else { "digests NOT OK" };
        let verdict = if self.use_colors {
            if report.is_ok() {
                style(verdict).green().to_string()
            } else {
                style(verdict).red().bold().to_string()
            }
        } else {
            verdict.to_string()
        };
        let _ = self.term.write_line(&format!(
            "{}: size {} md5 {} {verdict}",
            package.display(),
            report.size,
            report.md5
        ));

        if self.verbose && (report.has_header_signature || report.has_payload_signature) {
            let _ = self
                .term
                .write_line("  cryptographic signatures present but not checked");
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_success(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.err_term.write_line(message);
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}
