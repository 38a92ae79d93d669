//! Error types for the mapping engine.

use crate::geom::SurfaceHandle;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid surface handle: {0}")]
    InvalidSurface(SurfaceHandle),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("device-to-logical transform is not invertible")]
    NotInvertible,
    #[error("driver rejected {0}")]
    DriverRejected(&'static str),
    #[error("surface description error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type MapResult<T> = Result<T, MapError>;

/// Outcome of a setter that reports the value it replaced.
///
/// Extent and scale setters are ignored (not failed) when the mapping mode does not
/// allow adjustable extents; `Unchanged` makes that case visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change<T> {
    /// State was mutated; carries the previous value.
    Applied(T),
    /// Mode forbids the mutation; carries the current (untouched) value.
    Unchanged(T),
    /// A driver hook handled the call and the generic state was bypassed.
    Delegated,
}

impl<T: Copy> Change<T> {
    /// The value reported back to the caller, if the generic path produced one.
    pub fn previous(&self) -> Option<T> {
        match *self {
            Change::Applied(v) | Change::Unchanged(v) => Some(v),
            Change::Delegated => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Change::Applied(_))
    }
}
