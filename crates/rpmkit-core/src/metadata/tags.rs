//! Tag numbers and file flag bits.

use bitflags::bitflags;

/// Metadata section tags.
#[allow(missing_docs)]
pub mod tag {
    pub const HEADER_I18N_TABLE: i32 = 100;
    pub const NAME: i32 = 1000;
    pub const VERSION: i32 = 1001;
    pub const RELEASE: i32 = 1002;
    pub const EPOCH: i32 = 1003;
    pub const SUMMARY: i32 = 1004;
    pub const DESCRIPTION: i32 = 1005;
    pub const BUILD_TIME: i32 = 1006;
    pub const BUILD_HOST: i32 = 1007;
    pub const SIZE: i32 = 1009;
    pub const DISTRIBUTION: i32 = 1010;
    pub const VENDOR: i32 = 1011;
    pub const LICENSE: i32 = 1014;
    pub const PACKAGER: i32 = 1015;
    pub const GROUP: i32 = 1016;
    pub const URL: i32 = 1020;
    pub const OS: i32 = 1021;
    pub const ARCH: i32 = 1022;
    pub const OLD_FILENAMES: i32 = 1027;
    pub const FILE_SIZES: i32 = 1028;
    pub const FILE_MODES: i32 = 1030;
    pub const FILE_RDEVS: i32 = 1033;
    pub const FILE_MTIMES: i32 = 1034;
    /// Hex digests; MD5 in older packages, algorithm inferred from length.
    pub const FILE_DIGESTS: i32 = 1035;
    pub const FILE_LINKTOS: i32 = 1036;
    pub const FILE_FLAGS: i32 = 1037;
    pub const FILE_USERNAME: i32 = 1039;
    pub const FILE_GROUPNAME: i32 = 1040;
    pub const SOURCE_RPM: i32 = 1044;
    pub const ARCHIVE_SIZE: i32 = 1046;
    pub const CHANGELOG_TIME: i32 = 1080;
    pub const CHANGELOG_NAME: i32 = 1081;
    pub const CHANGELOG_TEXT: i32 = 1082;
    pub const FILE_DEVICES: i32 = 1095;
    pub const FILE_INODES: i32 = 1096;
    pub const FILE_LANGS: i32 = 1097;
    pub const DIR_INDEXES: i32 = 1116;
    pub const BASENAMES: i32 = 1117;
    pub const DIRNAMES: i32 = 1118;
    pub const PAYLOAD_FORMAT: i32 = 1124;
    pub const PAYLOAD_COMPRESSOR: i32 = 1125;
    pub const PAYLOAD_FLAGS: i32 = 1126;
}

/// Signature section tags.
#[allow(missing_docs)]
pub mod sigtag {
    pub const DSA: i32 = 267;
    pub const RSA: i32 = 268;
    pub const SHA1: i32 = 269;
    /// Byte count of metadata section plus compressed payload.
    pub const SIZE: i32 = 1000;
    pub const PGP: i32 = 1002;
    /// MD5 of metadata section plus compressed payload.
    pub const MD5: i32 = 1004;
    pub const GPG: i32 = 1005;
    pub const PAYLOAD_SIZE: i32 = 1007;
}

/// Tags every metadata section must carry, checked in this order.
pub const REQUIRED_HEADER_TAGS: &[i32] = &[
    tag::HEADER_I18N_TABLE,
    tag::NAME,
    tag::VERSION,
    tag::RELEASE,
    tag::SUMMARY,
    tag::DESCRIPTION,
    tag::SIZE,
    tag::LICENSE,
    tag::GROUP,
    tag::OS,
    tag::ARCH,
    tag::PAYLOAD_FORMAT,
    tag::PAYLOAD_COMPRESSOR,
    tag::PAYLOAD_FLAGS,
];

bitflags! {
    /// Per-file attribute bits from the file flags array.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FileFlags: u32 {
        const CONFIG = 1;
        const DOC = 1 << 1;
        const ICON = 1 << 2;
        const MISSING_OK = 1 << 3;
        const NO_REPLACE = 1 << 4;
        const SPEC_FILE = 1 << 5;
        const GHOST = 1 << 6;
        const LICENSE = 1 << 7;
        const README = 1 << 8;
        const UNPATCHED = 1 << 9;
        const PUBKEY = 1 << 10;
        const POLICY = 1 << 11;
    }
}

impl FileFlags {
    /// Single-letter marker used in verification listings.
    ///
    /// Returns `' '` when none of the listed attributes is set.
    #[must_use]
    pub const fn marker(self) -> char {
        if self.contains(Self::CONFIG) {
            'c'
        } else if self.contains(Self::DOC) {
            'd'
        } else if self.contains(Self::GHOST) {
            'g'
        } else if self.contains(Self::LICENSE) {
            'l'
        } else if self.contains(Self::README) {
            'r'
        } else {
            ' '
        }
    }
}
