//! Error taxonomy: configuration errors at construction, allocation
//! failures at the operation that triggered them. A missing key is not an
//! error; lookups report it as `None`/`false`.

/// Invalid construction parameters. The table is never created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `bucket_count` must be positive.
    #[error("bucket count must be greater than zero")]
    ZeroBuckets,

    /// The requested hash algorithm id or name is not part of the family.
    #[error("unrecognized hash algorithm: {0}")]
    UnknownHashAlgorithm(String),
}

/// Errors returned by table operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The injected allocator refused a request. The table is left exactly
    /// as it was before the call.
    #[error("allocator could not satisfy a request for {requested} bytes")]
    Allocation { requested: usize },
}

/// Result alias for table operations.
pub type MapResult<T> = Result<T, MapError>;

/// Closed status set for callers that report outcomes as codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    AllocationFailure,
    ConfigurationError,
    NotFound,
}

impl MapError {
    pub fn status(&self) -> Status {
        match self {
            MapError::Config(_) => Status::ConfigurationError,
            MapError::Allocation { .. } => Status::AllocationFailure,
        }
    }
}

impl Status {
    /// Status of a lookup: `Success` when the key was present, `NotFound`
    /// otherwise. Takes the result of `get` or `get_into`.
    pub fn from_lookup<T>(found: Option<T>) -> Self {
        match found {
            Some(_) => Status::Success,
            None => Status::NotFound,
        }
    }

    /// Status of a removal; `remove` reports whether the key existed.
    pub fn from_removal(existed: bool) -> Self {
        if existed {
            Status::Success
        } else {
            Status::NotFound
        }
    }
}

impl<T> From<&MapResult<T>> for Status {
    fn from(r: &MapResult<T>) -> Self {
        match r {
            Ok(_) => Status::Success,
            Err(e) => e.status(),
        }
    }
}
