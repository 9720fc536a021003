//! The authoritative seat grid and its locking discipline.
//!
//! A [`SeatGrid`] is the single source of truth for seat state. Correctness
//! hinges on one rule: "check the seat is free" and "mark it reserved" must
//! never interleave across tasks. Both happen inside one critical section,
//! together with the free-seat counter update, so the counter can never
//! drift from the cells and `is_full` stays O(1).
//!
//! ## Invariants
//!
//! - A `Free -> Reserved` transition is exclusive: for any cell, exactly one
//!   concurrent caller wins.
//! - Reserved cells never revert to `Free`; there is no cancellation.
//! - `free_count` equals the number of `Free` cells at every lock release.
//!
//! The guard is a scoped [`std::sync::Mutex`] acquisition. A panic inside
//! the critical section releases the lock on unwind and surfaces to other
//! callers as [`Error::LockPoisoned`] rather than a deadlock or silent
//! corruption.

use crate::error::{Error, Result};
use core::fmt;
use std::sync::Mutex;


/// The immutable rows×cols size of a grid.
///
/// Fixed at construction and communicated to every client once per
/// connection. Reading dimensions never takes the grid lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    rows: u32,
    cols: u32,
}

impl Dimensions {
    /// Validates and builds a set of grid dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either side is zero or the
    /// total seat count would overflow a `u32`.
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        if rows == 0 || cols == 0 || rows.checked_mul(cols).is_none() {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub const fn rows(&self) -> u32 {
        self.rows
    }

    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of seats in the grid.
    pub const fn seat_count(&self) -> u32 {
        // Checked at construction.
        self.rows * self.cols
    }

    /// Whether `(row, col)` addresses a seat inside the grid.
    pub const fn contains(&self, row: u32, col: u32) -> bool {
        row < self.rows && col < self.cols
    }

    const fn index_of(&self, row: u32, col: u32) -> usize {
        row as usize * self.cols as usize + col as usize
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// The state of one seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatState {
    Free,
    Reserved,
}

/// The result of one reservation attempt.
///
/// All three variants are ordinary outcomes. Losing a race
/// ([`AlreadyReserved`]) is expected and frequent under contention.
///
/// [`AlreadyReserved`]: ReservationOutcome::AlreadyReserved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReservationOutcome {
    /// This call transitioned the seat from free to reserved.
    Reserved,
    /// The seat was already reserved by an earlier call.
    AlreadyReserved,
    /// The grid had no free seats left when the call was made. Terminal:
    /// once observed, every later attempt reports the same.
    SoldOut,
}

struct GridState {
    cells: Vec<SeatState>,
    free_count: u32,
}

/// A fixed-size grid of seats with exclusive check-and-reserve.
///
/// The grid wraps its mutable state in a single [`Mutex`], allowing safe
/// shared use across tasks via `Arc`. The lock covers both the cell array
/// and the free-seat counter; no state is readable or writable outside it
/// except the immutable [`Dimensions`].
///
/// ## Recommended Use
///
/// - Construct once at startup, share by `Arc` into each connection task.
/// - Never hold the guard across an `.await`; every method here acquires
///   and releases it internally.
pub struct SeatGrid {
    dims: Dimensions,
    state: Mutex<GridState>,
}

impl SeatGrid {
    /// Creates a grid with every seat free.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            state: Mutex::new(GridState {
                cells: vec![SeatState::Free; dims.seat_count() as usize],
                free_count: dims.seat_count(),
            }),
        }
    }

    /// Returns the grid dimensions. Lock-free; dimensions are immutable
    /// after construction.
    pub const fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Attempts to reserve the seat at `(row, col)`.
    ///
    /// The check and the write happen in one critical section, so for any
    /// seat exactly one concurrent caller observes `Free` and wins. The
    /// free-seat counter is decremented in the same section.
    ///
    /// # Outcomes
    ///
    /// - [`ReservationOutcome::Reserved`]: this call won the seat.
    /// - [`ReservationOutcome::AlreadyReserved`]: the seat was taken.
    /// - [`ReservationOutcome::SoldOut`]: no seats were free at all.
    ///
    /// # Errors
    ///
    /// - [`Error::SeatOutOfRange`] if the coordinates fall outside the
    ///   grid; state is never touched in that case.
    /// - [`Error::LockPoisoned`] if a previous caller panicked inside the
    ///   critical section.
    pub fn try_reserve(&self, row: u32, col: u32) -> Result<ReservationOutcome> {
        if !self.dims.contains(row, col) {
            return Err(Error::SeatOutOfRange {
                row,
                col,
                dims: self.dims,
            });
        }

        let mut state = self.state.lock()?;
        if state.free_count == 0 {
            return Ok(ReservationOutcome::SoldOut);
        }

        let idx = self.dims.index_of(row, col);
        match state.cells[idx] {
            SeatState::Free => {
                state.cells[idx] = SeatState::Reserved;
                state.free_count -= 1;
                Ok(ReservationOutcome::Reserved)
            }
            SeatState::Reserved => Ok(ReservationOutcome::AlreadyReserved),
        }
    }

    /// Whether every seat is reserved. Monotonic: once `true`, it stays
    /// `true` for the life of the grid.
    pub fn is_full(&self) -> Result<bool> {
        Ok(self.state.lock()?.free_count == 0)
    }

    /// Number of seats still free.
    pub fn remaining(&self) -> Result<u32> {
        Ok(self.state.lock()?.free_count)
    }

    /// A consistent copy of every cell, taken under the guard.
    ///
    /// This is the only sanctioned way to observe more than one cell:
    /// reading cells individually between mutations could never represent
    /// a state the grid actually passed through.
    pub fn snapshot(&self) -> Result<Vec<SeatState>> {
        Ok(self.state.lock()?.cells.clone())
    }
}
