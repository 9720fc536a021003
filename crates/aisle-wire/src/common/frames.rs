//! Frame types and the fixed-width little-endian codec.
//!
//! The protocol has exactly three frames, all fixed size, all
//! little-endian regardless of host architecture. Encoding and decoding
//! are pure functions over fixed arrays so they can be tested without a
//! socket and reused by any transport.
//!
//! ## Frames
//!
//! - [`aisle::Dimensions`] - sent by the server once per connection,
//!   immediately after accept.
//! - [`SeatRequest`] - sent by the client, one per reservation attempt.
//! - [`ReplyCode`] - sent by the server, one per request, plus the
//!   terminal [`ReplyCode::SoldOut`] cases described in the server crate.

use crate::common::error::WireError;
use aisle::Dimensions;
use bytes::{Buf, BufMut};

/// Size in bytes of an encoded [`aisle::Dimensions`] frame.
pub const DIMENSIONS_FRAME_LEN: usize = 8;

/// Size in bytes of an encoded [`SeatRequest`] frame.
pub const REQUEST_FRAME_LEN: usize = 8;

/// Size in bytes of an encoded [`ReplyCode`] frame.
pub const REPLY_FRAME_LEN: usize = 4;

/// One reservation attempt: the seat a client proposes to take.
///
/// Coordinates are 0-based and unvalidated at this layer; the server's
/// grid rejects out-of-range values without touching state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeatRequest {
    pub row: u32,
    pub col: u32,
}

/// The server's verdict on one reservation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyCode {
    /// The seat is now yours.
    Granted,
    /// The seat was already taken (or the request was malformed); try
    /// another.
    Taken,
    /// No free seats remain anywhere. Terminal: the server closes the
    /// connection after sending this.
    SoldOut,
}

impl ReplyCode {
    /// The on-wire integer for this reply.
    pub const fn code(self) -> i32 {
        match self {
            Self::Granted => 1,
            Self::Taken => 0,
            Self::SoldOut => -1,
        }
    }

    /// Decodes an on-wire integer.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidReplyCode`] for anything outside
    /// {1, 0, -1}.
    pub fn from_code(code: i32) -> Result<Self, WireError> {
        match code {
            1 => Ok(Self::Granted),
            0 => Ok(Self::Taken),
            -1 => Ok(Self::SoldOut),
            other => Err(WireError::InvalidReplyCode(other)),
        }
    }
}

/// Encodes a dimensions frame: `rows` then `cols`, each `u32` LE.
pub fn encode_dimensions(dims: Dimensions) -> [u8; DIMENSIONS_FRAME_LEN] {
    let mut frame = [0u8; DIMENSIONS_FRAME_LEN];
    let mut buf = &mut frame[..];
    buf.put_u32_le(dims.rows());
    buf.put_u32_le(dims.cols());
    frame
}

/// Decodes a dimensions frame.
///
/// # Errors
///
/// Returns [`WireError::InvalidDimensions`] if the announced values cannot
/// describe a grid (zero rows/cols, seat-count overflow).
pub fn decode_dimensions(frame: &[u8; DIMENSIONS_FRAME_LEN]) -> Result<Dimensions, WireError> {
    let mut buf = &frame[..];
    let rows = buf.get_u32_le();
    let cols = buf.get_u32_le();
    Dimensions::new(rows, cols).map_err(WireError::InvalidDimensions)
}

/// Encodes a request frame: `row` then `col`, each `u32` LE.
pub fn encode_request(request: SeatRequest) -> [u8; REQUEST_FRAME_LEN] {
    let mut frame = [0u8; REQUEST_FRAME_LEN];
    let mut buf = &mut frame[..];
    buf.put_u32_le(request.row);
    buf.put_u32_le(request.col);
    frame
}

/// Decodes a request frame. Total: every bit pattern is a structurally
/// valid request; range checking belongs to the grid.
pub fn decode_request(frame: &[u8; REQUEST_FRAME_LEN]) -> SeatRequest {
    let mut buf = &frame[..];
    SeatRequest {
        row: buf.get_u32_le(),
        col: buf.get_u32_le(),
    }
}

/// Encodes a reply frame: one `i32` LE.
pub fn encode_reply(reply: ReplyCode) -> [u8; REPLY_FRAME_LEN] {
    let mut frame = [0u8; REPLY_FRAME_LEN];
    let mut buf = &mut frame[..];
    buf.put_i32_le(reply.code());
    frame
}

/// Decodes a reply frame.
///
/// # Errors
///
/// Returns [`WireError::InvalidReplyCode`] for codes outside the protocol.
pub fn decode_reply(frame: &[u8; REPLY_FRAME_LEN]) -> Result<ReplyCode, WireError> {
    let mut buf = &frame[..];
    ReplyCode::from_code(buf.get_i32_le())
}
