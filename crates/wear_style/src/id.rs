//! Bounded identifiers for settings and options

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StyleError};

/// Identifier of a [`UserStyleSetting`](crate::UserStyleSetting).
///
/// Setting ids are persisted as keys of [`UserStyleData`](crate::UserStyleData)
/// so their length is bounded.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SettingId(String);

impl SettingId {
    /// Maximum length in bytes
    pub const MAX_LENGTH: usize = 40;

    /// Create an id, failing if it exceeds [`Self::MAX_LENGTH`] bytes
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.len() > Self::MAX_LENGTH {
            return Err(StyleError::SettingIdTooLong {
                len: id.len(),
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SettingId {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for SettingId {
    type Error = StyleError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SettingId> for String {
    fn from(id: SettingId) -> Self {
        id.0
    }
}

/// Identifier of an option within a setting.
///
/// Option ids are opaque bytes. Range settings encode their value in the id,
/// list settings usually use UTF-8 names.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct OptionId(Vec<u8>);

impl OptionId {
    /// Maximum length in bytes
    pub const MAX_LENGTH: usize = 1024;

    /// Create an id, failing if it exceeds [`Self::MAX_LENGTH`] bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() > Self::MAX_LENGTH {
            return Err(StyleError::OptionIdTooLong {
                len: bytes.len(),
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(bytes))
    }

    /// Create an id from the UTF-8 bytes of a string
    pub fn from_name(name: &str) -> Result<Self> {
        Self::new(name.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    // Fixed-width encodings produced by range settings never exceed the limit.
    pub(crate) fn from_f64(value: f64) -> Self {
        Self(value.to_be_bytes().to_vec())
    }

    pub(crate) fn from_i64(value: i64) -> Self {
        Self(value.to_be_bytes().to_vec())
    }

    pub(crate) fn from_bool(value: bool) -> Self {
        Self(vec![u8::from(value)])
    }

    pub(crate) fn to_f64(&self) -> Option<f64> {
        let bytes: [u8; 8] = self.0.as_slice().try_into().ok()?;
        Some(f64::from_be_bytes(bytes))
    }

    pub(crate) fn to_i64(&self) -> Option<i64> {
        let bytes: [u8; 8] = self.0.as_slice().try_into().ok()?;
        Some(i64::from_be_bytes(bytes))
    }
}

impl fmt::Debug for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionId({self})")
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) if s.chars().all(|c| !c.is_control()) => f.write_str(s),
            _ => write!(f, "0x{}", hex::encode(&self.0)),
        }
    }
}

impl TryFrom<Vec<u8>> for OptionId {
    type Error = StyleError;

    fn try_from(value: Vec<u8>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<OptionId> for Vec<u8> {
    fn from(id: OptionId) -> Self {
        id.0
    }
}
