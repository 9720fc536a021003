//! Seat sources for a session.
//!
//! The session loop does not care where candidate seats come from; it asks
//! a [`SeatPicker`] and exchanges whatever comes back. Two sources ship:
//! interactive stdin prompts and a randomized generator with think time.

use aisle::Dimensions;
use aisle_wire::SeatRequest;
use anyhow::bail;
use core::ops::RangeInclusive;
use core::time::Duration;
use rand::Rng;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::sleep;

/// Where the next candidate seat comes from.
pub trait SeatPicker {
    /// Produces the next seat to attempt, within `dims`.
    async fn pick(&mut self, dims: Dimensions) -> anyhow::Result<SeatRequest>;
}

/// Uniform random seats with a bounded pause between attempts.
pub struct RandomPicker {
    think_ms: RangeInclusive<u64>,
}

impl RandomPicker {
    pub fn new(think_ms: RangeInclusive<u64>) -> Self {
        Self { think_ms }
    }
}

impl SeatPicker for RandomPicker {
    async fn pick(&mut self, dims: Dimensions) -> anyhow::Result<SeatRequest> {
        // The rng handle must not live across the await below.
        let (row, col, think) = {
            let mut rng = rand::rng();
            (
                rng.random_range(0..dims.rows()),
                rng.random_range(0..dims.cols()),
                rng.random_range(self.think_ms.clone()),
            )
        };
        sleep(Duration::from_millis(think)).await;
        Ok(SeatRequest { row, col })
    }
}

/// Interactive prompts on stdin, re-asking until the input is a valid
/// coordinate.
pub struct ManualPicker {
    lines: Lines<BufReader<Stdin>>,
}

impl ManualPicker {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn prompt(&mut self, label: &str, limit: u32) -> anyhow::Result<u32> {
        loop {
            print!("{label}: ");
            std::io::stdout().flush()?;

            let Some(line) = self.lines.next_line().await? else {
                bail!("stdin closed while picking a seat");
            };
            match line.trim().parse::<u32>() {
                Ok(value) if value < limit => return Ok(value),
                _ => println!(
                    "Invalid coordinate: enter an integer between 0 and {}.",
                    limit - 1
                ),
            }
        }
    }
}

impl SeatPicker for ManualPicker {
    async fn pick(&mut self, dims: Dimensions) -> anyhow::Result<SeatRequest> {
        let row = self.prompt("Row", dims.rows()).await?;
        let col = self.prompt("Column", dims.cols()).await?;
        Ok(SeatRequest { row, col })
    }
}
