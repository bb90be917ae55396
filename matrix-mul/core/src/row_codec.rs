//! Wire format of the one-shot worker channel.
//!
//! A channel carries exactly one frame: a 4-byte big-endian length prefix
//! followed by N big-endian `i64` values. The reader knows N and rejects any
//! frame whose payload is not exactly `8 * N` bytes.

use crate::RowResult;
use bytes::{Buf, BufMut, BytesMut};
use futures::{SinkExt, StreamExt};
use std::io;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};

const LENGTH_PREFIX: usize = 4;
const VALUE_WIDTH: usize = std::mem::size_of::<i64>();

#[derive(Debug, Error)]
pub enum RowCodecError {
    #[error("channel i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("channel closed before a row was received")]
    ChannelClosed,

    #[error("row payload is {actual} bytes, expected {expected}")]
    PayloadLength { expected: usize, actual: usize },
}

/// Payload bytes of a row with `size` columns
pub fn payload_len(size: usize) -> usize {
    size * VALUE_WIDTH
}

/// Total bytes a channel must hold for one row with `size` columns
pub fn frame_len(size: usize) -> usize {
    LENGTH_PREFIX + payload_len(size)
}

fn codec(size: usize) -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .length_field_length(LENGTH_PREFIX)
        .max_frame_length(payload_len(size))
        .new_codec()
}

/// Sends `result` as a single frame, then closes the writing end
pub async fn write_row<W>(writer: W, result: &RowResult) -> Result<(), RowCodecError>
where
    W: AsyncWrite + Unpin,
{
    let mut payload = BytesMut::with_capacity(payload_len(result.len()));
    for value in result.values() {
        payload.put_i64(*value);
    }

    let mut framed = FramedWrite::new(writer, codec(result.len()));
    framed.send(payload.freeze()).await?;
    framed.into_inner().shutdown().await?;
    Ok(())
}

/// Reads exactly one row of `size` values from a channel
pub async fn read_row<R>(reader: &mut R, size: usize) -> Result<RowResult, RowCodecError>
where
    R: AsyncRead + Unpin,
{
    let mut framed = FramedRead::new(reader, codec(size));
    let mut frame = framed.next().await.ok_or(RowCodecError::ChannelClosed)??;

    let expected = payload_len(size);
    if frame.len() != expected {
        return Err(RowCodecError::PayloadLength {
            expected,
            actual: frame.len(),
        });
    }

    let values = (0..size).map(|_| frame.get_i64()).collect::<Vec<_>>();
    Ok(RowResult::new(values))
}
