//! Construction parameters for a table.

use crate::error::ConfigError;
use crate::hash::HashAlgorithm;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapConfig {
    /// Number of buckets. Fixed for the lifetime of the table.
    pub bucket_count: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hash_algorithm: HashAlgorithm,
}

impl MapConfig {
    /// Config with `bucket_count` buckets and the default (SDBM) hash.
    pub const fn new(bucket_count: usize) -> Self {
        Self {
            bucket_count,
            hash_algorithm: HashAlgorithm::Sdbm,
        }
    }

    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }

    /// Build a config from a raw algorithm id, as received over an FFI or
    /// from a stored setting.
    pub fn from_raw(bucket_count: usize, hash_id: u32) -> Result<Self, ConfigError> {
        let cfg = Self::new(bucket_count).with_hash_algorithm(HashAlgorithm::try_from(hash_id)?);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket_count == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        Ok(())
    }
}
