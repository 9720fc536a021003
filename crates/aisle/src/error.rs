use crate::grid::Dimensions;
use std::sync::{MutexGuard, PoisonError};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors the seat grid can produce.
///
/// Losing a race for a seat is *not* an error: it surfaces as
/// [`ReservationOutcome::AlreadyReserved`]. The variants here are the cases
/// a caller cannot recover from by simply trying another seat.
///
/// [`ReservationOutcome::AlreadyReserved`]: crate::ReservationOutcome::AlreadyReserved
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested dimensions cannot describe a seat grid.
    ///
    /// Rows and columns must both be positive, and their product must fit
    /// in a `u32` seat count.
    #[error("invalid grid dimensions: {rows} rows x {cols} cols")]
    InvalidDimensions { rows: u32, cols: u32 },

    /// The requested coordinates lie outside the grid.
    ///
    /// This is a defensive boundary: coordinates arrive over the wire from
    /// untrusted peers, and an out-of-range request must never touch state.
    #[error("seat ({row}, {col}) is outside the {dims} grid")]
    SeatOutOfRange {
        row: u32,
        col: u32,
        dims: Dimensions,
    },

    /// The grid's guard was poisoned.
    ///
    /// Another task panicked while holding the lock. The guard is released
    /// on unwind, so the grid itself cannot be left locked, but its state
    /// is no longer trusted.
    #[error("seat grid lock was poisoned by a panicked task")]
    LockPoisoned,
}

// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
