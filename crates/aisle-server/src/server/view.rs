//! The console seat map.
//!
//! A single view task consumes reservation events from a bounded channel
//! and reprints the whole grid after each attempt: free seats as a plain
//! `A`, reserved seats as a red `R`, followed by a one-line status.
//!
//! The map always renders a snapshot taken under the grid's own guard.
//! Walking live cells between mutations could show a state the grid never
//! passed through, so the renderer never reads anything but snapshots.
//! Rendering is best-effort end to end: handlers drop events when the
//! channel is full, and the server never depends on this task at all.

use aisle::{Dimensions, SeatGrid, SeatState};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Capacity of the handler-to-view event channel. Events past this are
/// dropped; the next one repaints the full grid anyway.
pub const EVENT_BUFFER: usize = 64;

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// What one reservation attempt looked like from the server side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatAttempt {
    /// The attempt won the seat.
    Granted,
    /// The seat was already reserved.
    Taken,
    /// The coordinates were outside the grid.
    Rejected,
    /// The grid had no free seats left.
    SoldOut,
}

/// One attempt, as reported to the view after the reply went out.
#[derive(Clone, Copy, Debug)]
pub struct ReservationEvent {
    pub row: u32,
    pub col: u32,
    pub attempt: SeatAttempt,
    pub remaining: u32,
}

/// Drains reservation events and repaints the seat map for each.
///
/// Ends when every sender is gone (the dispatcher and all handlers have
/// terminated) or the grid's guard is poisoned.
pub async fn run(grid: Arc<SeatGrid>, mut events: mpsc::Receiver<ReservationEvent>) {
    while let Some(event) = events.recv().await {
        match grid.snapshot() {
            Ok(cells) => println!("{}", render(grid.dimensions(), &cells, &event)),
            Err(e) => {
                tracing::warn!(error = %e, "seat map snapshot failed");
                return;
            }
        }
    }
}

fn render(dims: Dimensions, cells: &[SeatState], event: &ReservationEvent) -> String {
    let mut out = String::with_capacity(cells.len() * 2 + 64);
    out.push('\n');
    for row in 0..dims.rows() {
        for col in 0..dims.cols() {
            match cells[(row * dims.cols() + col) as usize] {
                SeatState::Free => out.push('A'),
                SeatState::Reserved => {
                    out.push_str(RED);
                    out.push('R');
                    out.push_str(RESET);
                }
            }
        }
        out.push('\n');
    }

    let (row, col, remaining) = (event.row, event.col, event.remaining);
    match event.attempt {
        SeatAttempt::Granted => {
            out.push_str(&format!("seat ({row}, {col}) granted, {remaining} left"));
        }
        SeatAttempt::Taken => {
            out.push_str(&format!("seat ({row}, {col}) already taken"));
        }
        SeatAttempt::Rejected => {
            out.push_str(&format!("seat ({row}, {col}) is outside the grid"));
        }
        SeatAttempt::SoldOut => out.push_str("all seats reserved"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_marks_reserved_seats_in_red() {
        let dims = Dimensions::new(2, 2).unwrap();
        let grid = SeatGrid::new(dims);
        grid.try_reserve(0, 1).unwrap();

        let out = render(
            dims,
            &grid.snapshot().unwrap(),
            &ReservationEvent {
                row: 0,
                col: 1,
                attempt: SeatAttempt::Granted,
                remaining: 3,
            },
        );

        assert_eq!(out.matches('A').count(), 3);
        assert_eq!(out.matches('R').count(), 1);
        assert!(out.contains(RED));
        assert!(out.contains("seat (0, 1) granted, 3 left"));
    }

    #[test]
    fn render_reports_the_terminal_condition() {
        let dims = Dimensions::new(1, 1).unwrap();
        let grid = SeatGrid::new(dims);
        grid.try_reserve(0, 0).unwrap();

        let out = render(
            dims,
            &grid.snapshot().unwrap(),
            &ReservationEvent {
                row: 0,
                col: 0,
                attempt: SeatAttempt::SoldOut,
                remaining: 0,
            },
        );

        assert!(out.contains("all seats reserved"));
        assert_eq!(out.matches('A').count(), 0);
    }
}
