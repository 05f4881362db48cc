use std::collections::TryReserveError;
use thiserror::Error;

/// Everything that can go wrong while building or serializing an MPH.
///
/// The retryable variants ([`VertexConflict`](ChmError::VertexConflict),
/// [`NotPeelable`](ChmError::NotPeelable)) mean "this attempt lost the coin
/// flip, rehash with a new salt"; the rest are permanent for the job.
#[derive(Debug, Error)]
pub enum ChmError {
    #[error("invalid build parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("duplicate keys in input: construction can never succeed, fix the key list")]
    DuplicateKeys,
    #[error("within-edge vertex collision with fudging disabled")]
    VertexConflict,
    #[error("peeling stalled on a non-empty core ({core} edges left)")]
    NotPeelable { core: usize },
    #[error("gave up after {attempts} attempts: raise the expansion factor or the rehash limit")]
    Unresolvable { attempts: u32 },
    #[error("table allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serde(#[from] Box<bincode::ErrorKind>),
}

impl ChmError {
    /// True for failures that a fresh salt can fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::VertexConflict | Self::NotPeelable { .. })
    }
}
