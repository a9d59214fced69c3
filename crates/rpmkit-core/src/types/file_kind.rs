//! File type enumeration derived from mode bits.

use std::fmt;

/// Mask selecting the file type bits of a mode.
pub const S_IFMT: u32 = 0o170_000;

/// Type of a packaged file.
///
/// Both the metadata section and the archive encode the type in the high
/// bits of the mode, the same way `stat(2)` does.
///
/// # Examples
///
/// ```
/// use rpmkit_core::FileKind;
///
/// assert_eq!(FileKind::from_mode(0o100_644), FileKind::Regular);
/// assert_eq!(FileKind::from_mode(0o040_755), FileKind::Directory);
/// assert_eq!(FileKind::from_mode(0o120_777), FileKind::Symlink);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Character device.
    CharDevice,
    /// Block device.
    BlockDevice,
    /// Named pipe.
    Fifo,
    /// Unix socket.
    Socket,
    /// Type bits that match no known file type.
    Unknown,
}

impl FileKind {
    /// Classifies a mode by its `S_IFMT` bits.
    #[must_use]
    pub const fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            0o100_000 => Self::Regular,
            0o040_000 => Self::Directory,
            0o120_000 => Self::Symlink,
            0o020_000 => Self::CharDevice,
            0o060_000 => Self::BlockDevice,
            0o010_000 => Self::Fifo,
            0o140_000 => Self::Socket,
            _ => Self::Unknown,
        }
    }

    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_regular(self) -> bool {
        matches!(self, Self::Regular)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a symlink.
    #[must_use]
    pub const fn is_symlink(self) -> bool {
        matches!(self, Self::Symlink)
    }

    /// Leading character of an `ls -l` style permission string.
    #[must_use]
    pub const fn type_char(self) -> char {
        match self {
            Self::Regular => '-',
            Self::Directory => 'd',
            Self::Symlink => 'l',
            Self::CharDevice => 'c',
            Self::BlockDevice => 'b',
            Self::Fifo => 'p',
            Self::Socket => 's',
            Self::Unknown => '?',
        }
    }

    /// Renders `mode` as an `ls -l` style string such as `-rw-r--r--`.
    #[must_use]
    pub fn mode_string(mode: u32) -> String {
        const BITS: [(u32, char); 9] = [
            (0o400, 'r'),
            (0o200, 'w'),
            (0o100, 'x'),
            (0o040, 'r'),
            (0o020, 'w'),
            (0o010, 'x'),
            (0o004, 'r'),
            (0o002, 'w'),
            (0o001, 'x'),
        ];
        let mut out = String::with_capacity(10);
        out.push(Self::from_mode(mode).type_char());
        for (bit, c) in BITS {
            out.push(if mode & bit == 0 { '-' } else { c });
        }
        out
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Regular => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::CharDevice => "char device",
            Self::BlockDevice => "block device",
            Self::Fifo => "fifo",
            Self::Socket => "socket",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mode_regular() {
        let kind = FileKind::from_mode(0o100_755);
        assert!(kind.is_regular());
        assert!(!kind.is_directory());
        assert!(!kind.is_symlink());
    }

    #[test]
    fn test_from_mode_devices() {
        assert_eq!(FileKind::from_mode(0o020_666), FileKind::CharDevice);
        assert_eq!(FileKind::from_mode(0o060_660), FileKind::BlockDevice);
        assert_eq!(FileKind::from_mode(0o010_644), FileKind::Fifo);
        assert_eq!(FileKind::from_mode(0o140_755), FileKind::Socket);
    }

    #[test]
    fn test_from_mode_without_type_bits() {
        assert_eq!(FileKind::from_mode(0o644), FileKind::Unknown);
    }

    #[test]
    fn test_mode_string() {
        assert_eq!(FileKind::mode_string(0o100_644), "-rw-r--r--");
        assert_eq!(FileKind::mode_string(0o040_755), "drwxr-xr-x");
        assert_eq!(FileKind::mode_string(0o120_777), "lrwxrwxrwx");
    }

    #[test]
    fn test_display() {
        assert_eq!(FileKind::Symlink.to_string(), "symlink");
        assert_eq!(FileKind::CharDevice.to_string(), "char device");
    }
}
