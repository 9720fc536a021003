//! Connect-with-retry and the request/reply loop.
//!
//! A session mirrors the server handler's state machine from the other
//! side: read the dimensions greeting once, then alternate between asking
//! the picker for a candidate seat and exchanging one request/reply pair.
//! The loop ends when the server sends the sold-out terminal reply or
//! hangs up; both are ordinary session endings, since the server closes
//! connections once the grid fills.

use crate::client::picker::SeatPicker;
use anyhow::Context;
use aisle_wire::{ReplyCode, read_dimensions, read_reply, write_request};
use core::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::sleep;

/// What a finished session accomplished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    /// Seats this client ended up holding.
    pub reserved: u32,
}

/// Connects to the server, retrying once per second until the budget is
/// spent.
pub async fn connect(addr: &str, budget: Duration) -> anyhow::Result<TcpStream> {
    let mut attempts_left = budget.as_secs().max(1);
    loop {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                attempts_left -= 1;
                if attempts_left == 0 {
                    return Err(e).with_context(|| format!("failed to connect to {addr}"));
                }
                println!("could not connect to server, retrying...");
                tracing::debug!(error = %e, addr, "connect attempt failed");
                sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

/// Runs one session to completion.
///
/// Generic over the stream halves so tests can drive it over in-memory
/// pipes.
pub async fn run<R, W, P>(
    mut reader: R,
    mut writer: W,
    picker: &mut P,
) -> anyhow::Result<SessionSummary>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    P: SeatPicker,
{
    let dims = read_dimensions(&mut reader)
        .await
        .context("server never sent the grid dimensions")?;
    println!(
        "Seat map has {} rows and {} columns.",
        dims.rows(),
        dims.cols()
    );

    let mut reserved = 0u32;
    loop {
        let seat = picker.pick(dims).await?;
        println!("Attempting to reserve seat ({}, {}).", seat.row, seat.col);

        if let Err(e) = write_request(&mut writer, seat).await {
            if e.is_connection_closed() {
                // The grid filled while we deliberated and the server hung
                // up; the session simply ends.
                println!("Server closed the connection.");
                break;
            }
            return Err(e).context("failed to send reservation request");
        }

        match read_reply(&mut reader).await {
            Ok(ReplyCode::Granted) => {
                reserved += 1;
                println!("Success.");
            }
            Ok(ReplyCode::Taken) => println!("Failed: seat already reserved."),
            Ok(ReplyCode::SoldOut) => {
                println!("All seats reserved.");
                break;
            }
            Err(e) if e.is_connection_closed() => {
                println!("Server closed the connection.");
                break;
            }
            Err(e) => return Err(e).context("failed to read reservation reply"),
        }
    }

    Ok(SessionSummary { reserved })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle::Dimensions;
    use aisle_wire::{SeatRequest, read_request, write_dimensions, write_reply};
    use anyhow::bail;
    use std::collections::VecDeque;
    use tokio::io::duplex;

    struct ScriptPicker {
        seats: VecDeque<SeatRequest>,
    }

    impl ScriptPicker {
        fn new(seats: impl IntoIterator<Item = (u32, u32)>) -> Self {
            Self {
                seats: seats
                    .into_iter()
                    .map(|(row, col)| SeatRequest { row, col })
                    .collect(),
            }
        }
    }

    impl SeatPicker for ScriptPicker {
        async fn pick(&mut self, _dims: Dimensions) -> anyhow::Result<SeatRequest> {
            match self.seats.pop_front() {
                Some(seat) => Ok(seat),
                None => bail!("script ran out of seats"),
            }
        }
    }

    #[tokio::test]
    async fn session_counts_grants_and_stops_on_sold_out() {
        let (client, mut server) = duplex(256);
        let (client_rd, client_wr) = tokio::io::split(client);

        let server_task = tokio::spawn(async move {
            write_dimensions(&mut server, Dimensions::new(2, 2).unwrap())
                .await
                .unwrap();

            assert_eq!(
                read_request(&mut server).await.unwrap(),
                SeatRequest { row: 0, col: 0 }
            );
            write_reply(&mut server, ReplyCode::Granted).await.unwrap();

            assert_eq!(
                read_request(&mut server).await.unwrap(),
                SeatRequest { row: 0, col: 1 }
            );
            write_reply(&mut server, ReplyCode::Taken).await.unwrap();

            assert_eq!(
                read_request(&mut server).await.unwrap(),
                SeatRequest { row: 1, col: 1 }
            );
            write_reply(&mut server, ReplyCode::Granted).await.unwrap();
            // This grant filled the grid: terminal signal, then hang up.
            write_reply(&mut server, ReplyCode::SoldOut).await.unwrap();
        });

        let mut picker = ScriptPicker::new([(0, 0), (0, 1), (1, 1), (1, 0)]);
        let summary = run(client_rd, client_wr, &mut picker).await.unwrap();

        assert_eq!(summary.reserved, 2);
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn session_ends_when_told_the_grid_is_already_full() {
        let (client, mut server) = duplex(256);
        let (client_rd, client_wr) = tokio::io::split(client);

        let server_task = tokio::spawn(async move {
            write_dimensions(&mut server, Dimensions::new(3, 3).unwrap())
                .await
                .unwrap();
            // Late connection: the terminal reply is queued before any
            // request arrives.
            write_reply(&mut server, ReplyCode::SoldOut).await.unwrap();
        });

        let mut picker = ScriptPicker::new([(1, 1)]);
        let summary = run(client_rd, client_wr, &mut picker).await.unwrap();

        assert_eq!(summary.reserved, 0);
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn losing_seats_is_not_an_error() {
        let (client, mut server) = duplex(256);
        let (client_rd, client_wr) = tokio::io::split(client);

        let server_task = tokio::spawn(async move {
            write_dimensions(&mut server, Dimensions::new(1, 2).unwrap())
                .await
                .unwrap();
            for _ in 0..3 {
                read_request(&mut server).await.unwrap();
                write_reply(&mut server, ReplyCode::Taken).await.unwrap();
            }
            read_request(&mut server).await.unwrap();
            write_reply(&mut server, ReplyCode::SoldOut).await.unwrap();
        });

        let mut picker = ScriptPicker::new([(0, 0), (0, 1), (0, 0), (0, 1)]);
        let summary = run(client_rd, client_wr, &mut picker).await.unwrap();

        assert_eq!(summary.reserved, 0);
        server_task.await.unwrap();
    }
}
