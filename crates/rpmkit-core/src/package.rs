//! Package assembly: lead, signature, metadata and payload.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;

use log::debug;
use log::info;

use crate::Result;
use crate::RpmError;
use crate::config::ReadConfig;
use crate::formats::Compressor;
use crate::formats::CpioReader;
use crate::inspection::SignatureReport;
use crate::inspection::VerificationReport;
use crate::inspection::check_signature;
use crate::inspection::verify_archive;
use crate::io::skip_bytes;
use crate::lead::Lead;
use crate::metadata::MetadataView;
use crate::metadata::SignatureView;
use crate::section::alignment_padding;
use crate::section::decode;

/// A decoded package.
///
/// The lead and both sections are decoded eagerly. The payload is kept
/// compressed and decoded on demand, so metadata queries work even when
/// the payload compressor is unsupported.
///
/// # Examples
///
/// ```no_run
/// use rpmkit_core::Package;
/// use rpmkit_core::ReadConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let package = Package::open("hello-1.0-1.x86_64.rpm", &ReadConfig::default())?;
/// println!("{}", package.metadata().nevra()?);
/// for file in package.metadata().files()? {
///     println!("{}", file.path);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Package {
    lead: Lead,
    signature: SignatureView,
    metadata: MetadataView,
    payload: Vec<u8>,
    config: ReadConfig,
}

impl Package {
    /// Opens and decodes a package file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any part of the
    /// package is malformed. See [`Package::from_reader`].
    pub fn open<P: AsRef<Path>>(path: P, config: &ReadConfig) -> Result<Self> {
        let path = path.as_ref();
        debug!("opening package {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }

    /// Decodes a package from a stream.
    ///
    /// Reads the lead, the signature section, the alignment padding, the
    /// metadata section (checking its required tags), then the rest of the
    /// stream as the compressed payload.
    ///
    /// # Errors
    ///
    /// - any lead or section decoding error
    /// - [`RpmError::MissingRequiredTag`] for an incomplete metadata section
    /// - [`RpmError::LimitExceeded`] if the payload exceeds `max_payload_size`
    pub fn from_reader<R: Read>(mut reader: R, config: &ReadConfig) -> Result<Self> {
        let lead = Lead::read(&mut reader, config.strict_lead)?;

        let signature = decode(&mut reader, config)?;
        let padding = alignment_padding(signature.store().len());
        skip_bytes(&mut reader, padding as u64, "signature padding")?;

        let metadata = MetadataView::new(decode(&mut reader, config)?)?;

        let mut payload = Vec::new();
        reader
            .take(config.max_payload_size.saturating_add(1))
            .read_to_end(&mut payload)?;
        if payload.len() as u64 > config.max_payload_size {
            return Err(RpmError::LimitExceeded {
                resource: "payload size",
                actual: payload.len() as u64,
                max: config.max_payload_size,
            });
        }

        info!(
            "decoded package {} ({} byte payload)",
            lead.name(),
            payload.len()
        );

        Ok(Self {
            lead,
            signature: SignatureView::new(signature),
            metadata,
            payload,
            config: config.clone(),
        })
    }

    /// Returns the lead.
    #[must_use]
    pub const fn lead(&self) -> &Lead {
        &self.lead
    }

    /// Returns the signature view.
    #[must_use]
    pub const fn signature(&self) -> &SignatureView {
        &self.signature
    }

    /// Returns the metadata view.
    #[must_use]
    pub const fn metadata(&self) -> &MetadataView {
        &self.metadata
    }

    /// Returns the compressed payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the limits this package was decoded with.
    #[must_use]
    pub const fn config(&self) -> &ReadConfig {
        &self.config
    }

    /// Resolves the payload compressor named by the metadata.
    ///
    /// # Errors
    ///
    /// Returns [`RpmError::UnsupportedCompressor`] for an unknown name.
    pub fn compressor(&self) -> Result<Compressor> {
        Compressor::from_name(&self.metadata.payload_compressor()?)
    }

    /// Returns a stream of decompressed archive bytes.
    pub fn payload_reader(&self) -> Result<Box<dyn Read + '_>> {
        self.compressor()?.decoder(&self.payload[..])
    }

    /// Returns an archive reader over the decompressed payload.
    pub fn archive(&self) -> Result<CpioReader<Box<dyn Read + '_>>> {
        Ok(CpioReader::with_config(
            self.payload_reader()?,
            &self.config,
        ))
    }

    /// Decompresses the whole archive into memory.
    ///
    /// # Errors
    ///
    /// Returns [`RpmError::LimitExceeded`] if the archive exceeds
    /// `max_archive_size`.
    pub fn archive_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_archive(&mut out)?;
        Ok(out)
    }

    /// Streams the decompressed archive into `writer`.
    ///
    /// Returns the number of bytes written.
    pub fn write_archive<W: Write + ?Sized>(&self, writer: &mut W) -> Result<u64> {
        let max = self.config.max_archive_size;
        let mut limited = self.payload_reader()?.take(max.saturating_add(1));
        let written = io::copy(&mut limited, writer)?;
        if written > max {
            return Err(RpmError::LimitExceeded {
                resource: "archive size",
                actual: written,
                max,
            });
        }
        debug!("wrote {written} archive bytes");
        Ok(written)
    }

    /// Verifies every archived file against the metadata.
    pub fn verify(&self) -> Result<VerificationReport> {
        let mut archive = self.archive()?;
        let results = verify_archive(&self.metadata, &mut archive)?;
        Ok(VerificationReport::from_results(results))
    }

    /// Checks the size and MD5 recorded in the signature section.
    pub fn check_signature(&self) -> Result<SignatureReport> {
        let header = self.metadata.section().to_bytes();
        check_signature(&self.signature, &header, &self.payload)
    }
}
