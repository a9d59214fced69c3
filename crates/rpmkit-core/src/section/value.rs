//! Descriptor value types and their decoded forms.

use std::fmt;

/// Type code of a section descriptor.
///
/// Determines the element width and the decoding rule for the descriptor's
/// span of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// No value. Recognized but never decodable.
    Null,
    /// Single-byte characters.
    Char,
    /// Signed bytes.
    Int8,
    /// Big-endian 16-bit integers.
    Int16,
    /// Big-endian 32-bit integers.
    Int32,
    /// Big-endian 64-bit integers. Recognized but never decodable.
    Int64,
    /// One NUL-terminated string.
    StringZ,
    /// Opaque bytes.
    Binary,
    /// `count` consecutive NUL-terminated strings.
    StringArray,
    /// Localized string table; only the first variant is read.
    I18nString,
}

impl ValueType {
    /// Maps a raw type code to a value type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rpmkit_core::ValueType;
    ///
    /// assert_eq!(ValueType::from_code(4), Some(ValueType::Int32));
    /// assert_eq!(ValueType::from_code(10), None);
    /// ```
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Null),
            1 => Some(Self::Char),
            2 => Some(Self::Int8),
            3 => Some(Self::Int16),
            4 => Some(Self::Int32),
            5 => Some(Self::Int64),
            6 => Some(Self::StringZ),
            7 => Some(Self::Binary),
            8 => Some(Self::StringArray),
            9 => Some(Self::I18nString),
            _ => None,
        }
    }

    /// Returns the raw type code.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Null => 0,
            Self::Char => 1,
            Self::Int8 => 2,
            Self::Int16 => 3,
            Self::Int32 => 4,
            Self::Int64 => 5,
            Self::StringZ => 6,
            Self::Binary => 7,
            Self::StringArray => 8,
            Self::I18nString => 9,
        }
    }

    /// Returns the element width for fixed-width types.
    ///
    /// String types have no fixed width; their span is found by scanning
    /// for NUL terminators. `Int64` reports its width so its span can be
    /// bounds-checked even though it cannot be decoded.
    #[must_use]
    pub const fn width(self) -> Option<u64> {
        match self {
            Self::Null => Some(0),
            Self::Char | Self::Int8 | Self::Binary => Some(1),
            Self::Int16 => Some(2),
            Self::Int32 => Some(4),
            Self::Int64 => Some(8),
            Self::StringZ | Self::StringArray | Self::I18nString => None,
        }
    }

    /// Returns `true` for the types that always fail to decode.
    #[must_use]
    pub const fn is_unsupported(self) -> bool {
        matches!(self, Self::Null | Self::Int64)
    }

    /// Returns a human-readable name for this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Char => "char",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::StringZ => "string",
            Self::Binary => "binary",
            Self::StringArray => "string array",
            Self::I18nString => "i18n string",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded descriptor value.
///
/// Produced by [`Section::value`](crate::Section::value); the variant always
/// matches the descriptor's [`ValueType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Character bytes.
    Char(Vec<u8>),
    /// Signed bytes.
    Int8(Vec<i8>),
    /// 16-bit integers.
    Int16(Vec<i16>),
    /// 32-bit integers.
    Int32(Vec<i32>),
    /// A single string.
    String(String),
    /// Opaque bytes.
    Binary(Vec<u8>),
    /// A list of strings.
    StringArray(Vec<String>),
    /// The first variant of a localized string.
    I18nString(String),
}

impl Value {
    /// Returns the value type this value was decoded from.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Char(_) => ValueType::Char,
            Self::Int8(_) => ValueType::Int8,
            Self::Int16(_) => ValueType::Int16,
            Self::Int32(_) => ValueType::Int32,
            Self::String(_) => ValueType::StringZ,
            Self::Binary(_) => ValueType::Binary,
            Self::StringArray(_) => ValueType::StringArray,
            Self::I18nString(_) => ValueType::I18nString,
        }
    }

    /// Decodes a raw span according to `value_type`.
    ///
    /// `raw` must be the span returned by [`Section::get`](crate::Section::get)
    /// for a descriptor of `value_type`; returns `None` for the undecodable
    /// types.
    #[must_use]
    pub fn decode(value_type: ValueType, raw: &[u8]) -> Option<Self> {
        let value = match value_type {
            ValueType::Null | ValueType::Int64 => return None,
            ValueType::Char => Self::Char(raw.to_vec()),
            ValueType::Int8 => Self::Int8(raw.iter().map(|&b| i8::from_be_bytes([b])).collect()),
            ValueType::Int16 => Self::Int16(decode_i16(raw)),
            ValueType::Int32 => Self::Int32(decode_i32(raw)),
            ValueType::StringZ => Self::String(String::from_utf8_lossy(raw).into_owned()),
            ValueType::Binary => Self::Binary(raw.to_vec()),
            ValueType::StringArray => Self::StringArray(split_strings(raw)),
            ValueType::I18nString => Self::I18nString(String::from_utf8_lossy(raw).into_owned()),
        };
        Some(value)
    }
}

/// Decodes consecutive big-endian 16-bit integers, ignoring a trailing odd byte.
pub(crate) fn decode_i16(raw: &[u8]) -> Vec<i16> {
    raw.chunks_exact(2)
        .map(|c| i16::from_be_bytes([c[0], c[1]]))
        .collect()
}

/// Decodes consecutive big-endian 32-bit integers, ignoring trailing bytes.
pub(crate) fn decode_i32(raw: &[u8]) -> Vec<i32> {
    raw.chunks_exact(4)
        .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Splits a string-array window on NUL terminators.
///
/// Every string in the window is NUL-terminated, so the split yields one
/// empty tail which is dropped.
pub(crate) fn split_strings(raw: &[u8]) -> Vec<String> {
    let mut strings: Vec<String> = raw
        .split(|&b| b == 0)
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect();
    strings.pop();
    strings
}
