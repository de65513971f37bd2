//! Byte-blob hash family.
//!
//! Every algorithm is a pure function of the key bytes. The whole blob is
//! hashed, trailing NUL bytes included; the engine never interprets keys.

use crate::error::ConfigError;
use core::fmt;
use core::str::FromStr;

/// Width of every hash in the family. Arithmetic wraps at this width.
pub type HashValue = u32;

/// Resolved hashing strategy stored by a table.
pub(crate) type HashFn = fn(&[u8]) -> HashValue;

/// Closed set of supported hash algorithms.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HashAlgorithm {
    /// Rolling hash `h = h * 65599 + b`, seed 0.
    #[default]
    Sdbm,
    /// Rolling hash `h = h * 33 + b`, seed 5381.
    Djb2,
    /// 32-bit FNV-1a.
    Fnv1a,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 3] = [Self::Sdbm, Self::Djb2, Self::Fnv1a];

    /// Stable numeric id, the inverse of `TryFrom<u32>`.
    pub const fn id(self) -> u32 {
        match self {
            Self::Sdbm => 0,
            Self::Djb2 => 1,
            Self::Fnv1a => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sdbm => "sdbm",
            Self::Djb2 => "djb2",
            Self::Fnv1a => "fnv1a",
        }
    }

    pub(crate) const fn resolve(self) -> HashFn {
        match self {
            Self::Sdbm => sdbm,
            Self::Djb2 => djb2,
            Self::Fnv1a => fnv1a,
        }
    }

    #[inline]
    pub fn hash(self, bytes: &[u8]) -> HashValue {
        (self.resolve())(bytes)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for HashAlgorithm {
    type Error = ConfigError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|a| a.id() == id)
            .ok_or_else(|| ConfigError::UnknownHashAlgorithm(id.to_string()))
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownHashAlgorithm(s.to_string()))
    }
}

/// `h = (h << 6) + (h << 16) - h + b`, i.e. `h * 65599 + b`.
pub fn sdbm(bytes: &[u8]) -> HashValue {
    bytes.iter().fold(0, |h: HashValue, &b| {
        HashValue::from(b)
            .wrapping_add(h << 6)
            .wrapping_add(h << 16)
            .wrapping_sub(h)
    })
}

pub fn djb2(bytes: &[u8]) -> HashValue {
    bytes.iter().fold(5381, |h: HashValue, &b| {
        h.wrapping_mul(33).wrapping_add(HashValue::from(b))
    })
}

pub fn fnv1a(bytes: &[u8]) -> HashValue {
    const OFFSET: HashValue = 0x811c_9dc5;
    const PRIME: HashValue = 0x0100_0193;
    bytes
        .iter()
        .fold(OFFSET, |h, &b| (h ^ HashValue::from(b)).wrapping_mul(PRIME))
}
