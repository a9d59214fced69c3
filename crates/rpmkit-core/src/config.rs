//! Decoding limits for untrusted packages.

/// Limits applied while decoding a package.
///
/// Every size read from a package is attacker-controlled. These limits are
/// checked before any buffer of that size is allocated.
///
/// # Examples
///
/// ```
/// use rpmkit_core::ReadConfig;
///
/// // Use safe defaults
/// let config = ReadConfig::default();
///
/// // Allow larger payloads
/// let custom = ReadConfig {
///     max_payload_size: 8 * 1024 * 1024 * 1024, // 8 GB
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadConfig {
    /// Maximum number of descriptors in a section index.
    pub max_index_count: u32,

    /// Maximum size of a section store in bytes.
    pub max_store_size: u32,

    /// Maximum size of the compressed payload in bytes.
    pub max_payload_size: u64,

    /// Maximum size of the decompressed archive in bytes.
    pub max_archive_size: u64,

    /// Maximum content size of a single archive entry in bytes.
    pub max_entry_size: u64,

    /// Reject leads whose format version is not 3.0.
    pub strict_lead: bool,
}

impl Default for ReadConfig {
    /// Creates a `ReadConfig` with conservative limits.
    ///
    /// Default values:
    /// - `max_index_count`: 65,536
    /// - `max_store_size`: 64 MB
    /// - `max_payload_size`: 2 GB
    /// - `max_archive_size`: 4 GB
    /// - `max_entry_size`: 1 GB
    /// - `strict_lead`: true
    fn default() -> Self {
        Self {
            max_index_count: 65_536,
            max_store_size: 64 * 1024 * 1024,
            max_payload_size: 2 * 1024 * 1024 * 1024,
            max_archive_size: 4 * 1024 * 1024 * 1024,
            max_entry_size: 1024 * 1024 * 1024,
            strict_lead: true,
        }
    }
}

impl ReadConfig {
    /// Creates a permissive configuration for trusted packages.
    ///
    /// Raises every limit to the format maximum and accepts any lead
    /// version. Bounds checks on descriptor spans still apply.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            max_index_count: u32::MAX,
            max_store_size: u32::MAX,
            max_payload_size: u64::MAX,
            max_archive_size: u64::MAX,
            max_entry_size: u64::from(u32::MAX),
            strict_lead: false,
        }
    }
}
