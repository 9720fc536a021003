//! Error type for the seat-reservation wire protocol.
//!
//! Everything that can go wrong while moving frames falls into two camps:
//! the socket failed (short read, reset, broken pipe), or the peer sent
//! bytes that decode to nothing in the protocol. Both terminate the
//! affected connection only; neither is ever fatal to the process.

use std::io;

pub type Result<T> = core::result::Result<T, WireError>;

/// Unified error type for encoding, decoding, and moving protocol frames.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The underlying stream failed mid-frame.
    #[error("socket I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The peer sent a reply code outside the protocol's value set.
    #[error("invalid reply code on the wire: {0}")]
    InvalidReplyCode(i32),

    /// The peer announced dimensions that cannot describe a grid.
    #[error("invalid dimensions on the wire: {0}")]
    InvalidDimensions(#[source] aisle::Error),
}

impl WireError {
    /// Whether this error means the peer is simply gone.
    ///
    /// A connection that closes between frames is an ordinary end of
    /// session for this protocol, not a fault worth more than a debug log.
    pub fn is_connection_closed(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}
