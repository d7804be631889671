//! # Bounded Wire Text
//!
//! The receiving authority constrains every free-text field to a maximum
//! length and the acknowledgment tracking identifier to a short digit
//! string. These constraints are enforced at construction and at
//! deserialization, so a value of one of these types is valid by
//! construction — downstream code never re-checks lengths.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Violation of a wire-text constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// The value exceeds the field's maximum character count.
    #[error("text of {actual} characters exceeds the {max}-character limit")]
    TooLong {
        /// Maximum permitted character count.
        max: usize,
        /// Actual character count.
        actual: usize,
    },

    /// The value must be composed of ASCII digits.
    #[error("value {value:?} is not a 1-{max} digit identifier")]
    NotNumeric {
        /// The rejected value.
        value: String,
        /// Maximum permitted digit count.
        max: usize,
    },
}

/// A string bounded to at most `MAX` characters.
///
/// The inner value is private; the only constructor validates the bound,
/// and `Deserialize` goes through the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundedText<const MAX: usize>(String);

/// Error level, type code, and similar short descriptors.
pub type Text50 = BoundedText<50>;
/// Element names reported in acknowledgment errors.
pub type Text512 = BoundedText<512>;
/// Acknowledgment error message text.
pub type Text525 = BoundedText<525>;
/// Acknowledgment error context excerpts.
pub type Text4000 = BoundedText<4000>;

impl<const MAX: usize> BoundedText<MAX> {
    /// Construct, rejecting values longer than `MAX` characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TextError> {
        let value = value.into();
        let actual = value.chars().count();
        if actual > MAX {
            return Err(TextError::TooLong { max: MAX, actual });
        }
        Ok(Self(value))
    }

    /// The inner text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> std::fmt::Display for BoundedText<MAX> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const MAX: usize> AsRef<str> for BoundedText<MAX> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> Serialize for BoundedText<MAX> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, const MAX: usize> Deserialize<'de> for BoundedText<MAX> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        BoundedText::new(value).map_err(D::Error::custom)
    }
}

/// The tracking identifier assigned by the receiving authority to an
/// acknowledged filing: 1 to 14 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BsaId(String);

impl BsaId {
    const MAX_DIGITS: usize = 14;

    /// Construct, rejecting anything but 1-14 ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, TextError> {
        let value = value.into();
        let ok = !value.is_empty()
            && value.len() <= Self::MAX_DIGITS
            && value.bytes().all(|b| b.is_ascii_digit());
        if !ok {
            return Err(TextError::NotNumeric {
                value,
                max: Self::MAX_DIGITS,
            });
        }
        Ok(Self(value))
    }

    /// The identifier digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BsaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BsaId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BsaId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        BsaId::new(value).map_err(D::Error::custom)
    }
}
