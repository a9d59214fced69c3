//! Typed accessors over a section store.

use super::Section;
use super::ValueType;
use super::value::decode_i16;
use super::value::decode_i32;
use super::value::split_strings;
use crate::Result;
use crate::RpmError;

impl Section {
    fn expect_type(
        &self,
        tag: i32,
        accepted: &[ValueType],
        expected: &'static str,
    ) -> Result<&[u8]> {
        let (actual, raw) = self.get(tag)?;
        if accepted.contains(&actual) {
            Ok(raw)
        } else {
            Err(RpmError::TypeMismatch {
                tag,
                expected,
                actual,
            })
        }
    }

    /// Returns the first element of an `Int16` tag.
    ///
    /// # Errors
    ///
    /// Fails with [`RpmError::TagNotFound`], [`RpmError::TypeMismatch`], or
    /// [`RpmError::MalformedSection`] if the tag has a zero count.
    pub fn get_int16(&self, tag: i32) -> Result<i16> {
        self.get_int16_array(tag)?
            .first()
            .copied()
            .ok_or_else(|| self.empty_value(tag, 2))
    }

    /// Returns the first element of an `Int32` tag.
    ///
    /// # Errors
    ///
    /// Same as [`get_int16`](Self::get_int16).
    pub fn get_int32(&self, tag: i32) -> Result<i32> {
        self.get_int32_array(tag)?
            .first()
            .copied()
            .ok_or_else(|| self.empty_value(tag, 4))
    }

    /// Returns all elements of an `Int16` tag.
    pub fn get_int16_array(&self, tag: i32) -> Result<Vec<i16>> {
        let raw = self.expect_type(tag, &[ValueType::Int16], "int16")?;
        Ok(decode_i16(raw))
    }

    /// Returns all elements of an `Int32` tag.
    pub fn get_int32_array(&self, tag: i32) -> Result<Vec<i32>> {
        let raw = self.expect_type(tag, &[ValueType::Int32], "int32")?;
        Ok(decode_i32(raw))
    }

    /// Returns a `StringZ` or `I18nString` tag as text.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; package metadata in
    /// the wild is not reliably encoded.
    pub fn get_string(&self, tag: i32) -> Result<String> {
        let raw = self.expect_type(
            tag,
            &[ValueType::StringZ, ValueType::I18nString],
            "string",
        )?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    /// Returns every string of a `StringArray` tag.
    pub fn get_string_array(&self, tag: i32) -> Result<Vec<String>> {
        let raw = self.expect_type(tag, &[ValueType::StringArray], "string array")?;
        Ok(split_strings(raw))
    }

    /// Returns the raw bytes of a `Binary`, `Char` or `Int8` tag.
    pub fn get_binary(&self, tag: i32) -> Result<&[u8]> {
        self.expect_type(
            tag,
            &[ValueType::Binary, ValueType::Char, ValueType::Int8],
            "binary",
        )
    }

    fn empty_value(&self, tag: i32, width: u64) -> RpmError {
        let offset = self.descriptor(tag).map_or(0, |d| u64::from(d.offset));
        RpmError::MalformedSection {
            tag,
            offset,
            needed: width,
            store_size: self.store().len() as u64,
        }
    }
}

/// Lookups that treat an absent tag as `None`.
///
/// Every other failure still propagates.
pub(crate) trait OptionalTag<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalTag<T> for Result<T> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(RpmError::TagNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
