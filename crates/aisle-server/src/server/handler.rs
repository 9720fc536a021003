//! The per-connection protocol state machine.
//!
//! Each accepted connection runs one handler task through four states:
//!
//! - **Greeting**: send the grid dimensions, exactly once. A connection
//!   accepted after the grid already sold out gets the terminal reply here
//!   and closes, so a late client is never left without an answer.
//! - **AwaitingRequest**: block on one fixed-width request frame. A peer
//!   that hangs up (cleanly or not) ends this handler only.
//! - **Replying**: one `try_reserve` against the shared grid, one reply
//!   frame back. If the grid is full after the attempt, whoever filled
//!   it, the terminal reply follows immediately and the dispatcher is
//!   signalled to stop accepting.
//! - **Terminated**: the connection closes and the task ends.
//!
//! After every attempt, win or lose, the handler notifies the view task so
//! the console seat map stays current. The notification is strictly
//! best-effort: a full or closed channel never stalls or fails a handler.
//!
//! Out-of-range coordinates are a protocol-level rejection, not a fault:
//! the grid refuses them without touching state and the peer sees the same
//! reply as for a taken seat, free to try again.

use crate::server::view::{ReservationEvent, SeatAttempt};
use aisle::{Error as GridError, ReservationOutcome, SeatGrid};
use aisle_wire::{ReplyCode, WireError, read_request, write_dimensions, write_reply};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Everything a handler shares with the rest of the server.
///
/// The grid is the only cross-task mutable state; the event channel feeds
/// the view; the token tells the dispatcher the grid just sold out.
#[derive(Clone)]
pub struct HandlerContext {
    pub grid: Arc<SeatGrid>,
    pub events: mpsc::Sender<ReservationEvent>,
    pub sold_out: CancellationToken,
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl HandlerError {
    fn is_connection_closed(&self) -> bool {
        match self {
            Self::Wire(e) => e.is_connection_closed(),
            Self::Grid(_) => false,
        }
    }
}

/// Runs one connection to completion, logging the outcome.
///
/// Socket failures are not retried: they terminate this connection only
/// and the server keeps serving every other handler.
pub async fn serve_connection(stream: TcpStream, peer: SocketAddr, ctx: HandlerContext) {
    let (mut reader, mut writer) = stream.into_split();
    match connection_loop(&mut reader, &mut writer, &ctx).await {
        Ok(()) => tracing::debug!(%peer, "connection closed"),
        Err(e) if e.is_connection_closed() => tracing::debug!(%peer, "peer disconnected"),
        Err(e) => tracing::warn!(%peer, error = %e, "connection handler failed"),
    }
}

/// The protocol loop proper, generic over the stream halves so tests can
/// drive it over in-memory pipes.
async fn connection_loop<R, W>(
    reader: &mut R,
    writer: &mut W,
    ctx: &HandlerContext,
) -> Result<(), HandlerError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    // Greeting: dimensions, exactly once per connection.
    write_dimensions(writer, ctx.grid.dimensions()).await?;

    // A connection accepted after the fill still gets the terminal signal.
    if ctx.grid.is_full()? {
        write_reply(writer, ReplyCode::SoldOut).await?;
        return Ok(());
    }

    loop {
        let request = match read_request(reader).await {
            Ok(request) => request,
            Err(e) if e.is_connection_closed() => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let (reply, attempt) = match ctx.grid.try_reserve(request.row, request.col) {
            Ok(ReservationOutcome::Reserved) => (ReplyCode::Granted, SeatAttempt::Granted),
            Ok(ReservationOutcome::AlreadyReserved) => (ReplyCode::Taken, SeatAttempt::Taken),
            Ok(ReservationOutcome::SoldOut) => (ReplyCode::SoldOut, SeatAttempt::SoldOut),
            Err(GridError::SeatOutOfRange { .. }) => (ReplyCode::Taken, SeatAttempt::Rejected),
            Err(e) => return Err(e.into()),
        };

        let remaining = ctx.grid.remaining()?;
        let sold_out_now = remaining == 0;

        // Fullness reaches the dispatcher before the peer: the terminal
        // write below can fail, the token must not be lost with it.
        if sold_out_now {
            ctx.sold_out.cancel();
        }

        tracing::debug!(
            row = request.row,
            col = request.col,
            reply = reply.code(),
            "reservation attempt"
        );
        write_reply(writer, reply).await?;

        // Best-effort: the view may lag or be disabled entirely.
        let _ = ctx.events.try_send(ReservationEvent {
            row: request.row,
            col: request.col,
            attempt,
            remaining,
        });

        if reply == ReplyCode::SoldOut {
            // The request raced past the fill; the terminal reply was the
            // answer itself.
            return Ok(());
        }

        if sold_out_now {
            // The grid is full as of this attempt, whoever filled it:
            // terminal signal to this peer, then this handler is done.
            write_reply(writer, ReplyCode::SoldOut).await?;
            return Ok(());
        }
    }
}
