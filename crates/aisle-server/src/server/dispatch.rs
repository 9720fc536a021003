//! The accept loop and its cooperative stop.
//!
//! The dispatcher accepts connections and spawns one handler task each,
//! without ever blocking a subsequent accept on an earlier client. It
//! keeps accepting until one of two things happens:
//!
//! - a handler fills the grid and cancels the shared sold-out token, or
//! - an external shutdown signal (Ctrl-C / SIGTERM) resolves.
//!
//! Either way the stop is phase-ordered: close the listener first so no
//! new work arrives, then drain in-flight handlers for a bounded window,
//! then report whatever is still running and let process exit reap it.
//! Handlers never terminate the process themselves; the dispatcher owns
//! all shutdown ordering.

use crate::server::handler::{HandlerContext, serve_connection};
use crate::server::view::ReservationEvent;
use aisle::SeatGrid;
use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

/// Accepts connections against `grid` until the grid sells out or
/// `shutdown` resolves, then drains in-flight handlers.
///
/// Accept failures are logged and the loop continues; a broken single
/// accept must not take the service down.
pub async fn run<S>(
    listener: TcpListener,
    grid: Arc<SeatGrid>,
    events: mpsc::Sender<ReservationEvent>,
    shutdown: S,
    drain_timeout: Duration,
) where
    S: Future<Output = ()>,
{
    let sold_out = CancellationToken::new();
    let active = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = sold_out.cancelled() => {
                tracing::info!("all seats reserved, no longer accepting connections");
                break;
            }
            () = &mut shutdown => {
                tracing::info!("no longer accepting connections");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tracing::debug!(%peer, "accepted connection");
                    let ctx = HandlerContext {
                        grid: Arc::clone(&grid),
                        events: events.clone(),
                        sold_out: sold_out.clone(),
                    };
                    let active = Arc::clone(&active);
                    active.fetch_add(1, Ordering::Relaxed);
                    tokio::spawn(async move {
                        serve_connection(stream, peer, ctx).await;
                        active.fetch_sub(1, Ordering::Relaxed);
                    });
                }
                Err(e) => tracing::warn!(error = %e, "could not accept client connection"),
            }
        }
    }

    // No new work: release the port before draining.
    drop(listener);

    let drained = timeout(drain_timeout, async {
        while active.load(Ordering::Relaxed) > 0 {
            sleep(Duration::from_millis(50)).await;
        }
    })
    .await;

    match drained {
        Ok(()) => tracing::debug!("all connection handlers drained"),
        Err(_) => tracing::warn!(
            "drain timed out ({} handlers still active)",
            active.load(Ordering::Relaxed)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle::Dimensions;
    use aisle_wire::{ReplyCode, SeatRequest, read_dimensions, read_reply, write_request};
    use std::net::SocketAddr;
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn start(rows: u32, cols: u32) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let grid = Arc::new(SeatGrid::new(Dimensions::new(rows, cols).unwrap()));
        let (events, rx) = mpsc::channel(64);
        drop(rx);
        let handle = tokio::spawn(run(
            listener,
            grid,
            events,
            std::future::pending(),
            Duration::from_secs(3),
        ));
        (addr, handle)
    }

    async fn connect(addr: SocketAddr) -> TcpStream {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let dims = read_dimensions(&mut stream).await.unwrap();
        assert!(dims.seat_count() > 0);
        stream
    }

    async fn attempt(stream: &mut TcpStream, row: u32, col: u32) -> ReplyCode {
        write_request(stream, SeatRequest { row, col }).await.unwrap();
        read_reply(stream).await.unwrap()
    }

    #[tokio::test]
    async fn four_clients_fill_a_two_by_two_grid() {
        let (addr, handle) = start(2, 2).await;

        let mut c1 = connect(addr).await;
        let mut c2 = connect(addr).await;
        let mut c3 = connect(addr).await;
        let mut c4 = connect(addr).await;

        assert_eq!(attempt(&mut c1, 0, 0).await, ReplyCode::Granted);

        // c2 loses the race for (0, 0), then wins a free seat.
        assert_eq!(attempt(&mut c2, 0, 0).await, ReplyCode::Taken);
        assert_eq!(attempt(&mut c2, 0, 1).await, ReplyCode::Granted);

        assert_eq!(attempt(&mut c3, 1, 0).await, ReplyCode::Granted);

        // c4 fills the grid: its reply carries the grant, then the
        // terminal signal.
        assert_eq!(attempt(&mut c4, 1, 1).await, ReplyCode::Granted);
        assert_eq!(read_reply(&mut c4).await.unwrap(), ReplyCode::SoldOut);

        // A still-connected client's next exchange observes the terminal
        // signal too.
        assert_eq!(attempt(&mut c1, 0, 0).await, ReplyCode::SoldOut);

        drop(c2);
        drop(c3);

        // The dispatcher stops accepting and drains.
        timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn single_seat_grid_never_grants_twice() {
        let (addr, handle) = start(1, 1).await;

        let mut c1 = connect(addr).await;
        let mut c2 = connect(addr).await;

        assert_eq!(attempt(&mut c1, 0, 0).await, ReplyCode::Granted);
        assert_eq!(read_reply(&mut c1).await.unwrap(), ReplyCode::SoldOut);

        // The loser may see "taken" or "sold out" depending on ordering; a
        // second grant is never acceptable.
        let reply = attempt(&mut c2, 0, 0).await;
        assert_ne!(reply, ReplyCode::Granted);

        timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn external_shutdown_stops_accepting() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let grid = Arc::new(SeatGrid::new(Dimensions::new(2, 2).unwrap()));
        let (events, rx) = mpsc::channel(64);
        drop(rx);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(run(
            listener,
            grid,
            events,
            async move {
                let _ = shutdown_rx.await;
            },
            Duration::from_millis(200),
        ));

        // A client exchange works, then leaves before the shutdown.
        let mut c1 = connect(addr).await;
        assert_eq!(attempt(&mut c1, 0, 0).await, ReplyCode::Granted);
        drop(c1);

        shutdown_tx.send(()).unwrap();
        timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(TcpStream::connect(addr).await.is_err());
    }
}
