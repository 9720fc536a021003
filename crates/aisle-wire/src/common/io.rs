//! Async helpers that move exactly one frame at a time.
//!
//! Each reader blocks until a whole frame has arrived (`read_exact`); a
//! connection that closes mid-frame surfaces as an
//! [`std::io::ErrorKind::UnexpectedEof`] I/O error, which
//! [`WireError::is_connection_closed`] classifies for callers that treat
//! peer departure as an ordinary end of session.

use crate::common::error::Result;
use crate::common::frames::{
    DIMENSIONS_FRAME_LEN, REPLY_FRAME_LEN, REQUEST_FRAME_LEN, ReplyCode, SeatRequest,
    decode_dimensions, decode_reply, decode_request, encode_dimensions, encode_reply,
    encode_request,
};
use aisle::Dimensions;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Writes one dimensions frame.
pub async fn write_dimensions<W>(writer: &mut W, dims: Dimensions) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&encode_dimensions(dims)).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one dimensions frame.
pub async fn read_dimensions<R>(reader: &mut R) -> Result<Dimensions>
where
    R: AsyncRead + Unpin,
{
    let mut frame = [0u8; DIMENSIONS_FRAME_LEN];
    reader.read_exact(&mut frame).await?;
    decode_dimensions(&frame)
}

/// Writes one request frame.
pub async fn write_request<W>(writer: &mut W, request: SeatRequest) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&encode_request(request)).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one request frame.
pub async fn read_request<R>(reader: &mut R) -> Result<SeatRequest>
where
    R: AsyncRead + Unpin,
{
    let mut frame = [0u8; REQUEST_FRAME_LEN];
    reader.read_exact(&mut frame).await?;
    Ok(decode_request(&frame))
}

/// Writes one reply frame.
pub async fn write_reply<W>(writer: &mut W, reply: ReplyCode) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&encode_reply(reply)).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one reply frame.
pub async fn read_reply<R>(reader: &mut R) -> Result<ReplyCode>
where
    R: AsyncRead + Unpin,
{
    let mut frame = [0u8; REPLY_FRAME_LEN];
    reader.read_exact(&mut frame).await?;
    decode_reply(&frame)
}
