//! Frame codec for the IPC wire protocol.
//!
//! Frame format:
//! ```text
//! ┌──────────┬──────────┬────────────────────────┐
//! │ len (4B) │ type(1B) │   msgpack payload      │
//! │ u32 BE   │ u8       │                        │
//! └──────────┴──────────┴────────────────────────┘
//! ```
//! Length = sizeof(type byte) + sizeof(payload), NOT including the 4-byte prefix.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Message type: request from client.
pub const MSG_REQUEST: u8 = 0x01;
/// Message type: success response to client.
pub const MSG_RESPONSE: u8 = 0x02;
/// Message type: error response to client.
pub const MSG_ERROR: u8 = 0xFF;

/// One wire frame: a type tag plus its msgpack payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub msg_type: u8,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(msg_type: u8, payload: Vec<u8>) -> Self {
        Self { msg_type, payload }
    }

    /// Read one frame from the stream.
    ///
    /// Returns `None` on clean EOF. `max_frame_bytes` caps the accepted
    /// payload size; oversized and zero-length frames are protocol errors.
    pub async fn read<R: AsyncReadExt + Unpin>(
        reader: &mut R,
        max_frame_bytes: u32,
    ) -> std::io::Result<Option<Self>> {
        let mut len_buf = [0u8; 4];
        match reader.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        }

        let frame_len = u32::from_be_bytes(len_buf);
        if frame_len > max_frame_bytes {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("frame too large: {frame_len} bytes"),
            ));
        }
        if frame_len < 1 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "frame too short: missing type byte",
            ));
        }

        // Type byte + payload arrive as one read.
        let mut frame_data = vec![0u8; frame_len as usize];
        reader.read_exact(&mut frame_data).await?;

        let payload = frame_data.split_off(1);
        Ok(Some(Self::new(frame_data[0], payload)))
    }

    /// Write this frame to the stream.
    pub async fn write<W: AsyncWriteExt + Unpin>(&self, writer: &mut W) -> std::io::Result<()> {
        let frame_len = 1u32 + self.payload.len() as u32; // type byte + payload
        writer.write_all(&frame_len.to_be_bytes()).await?;
        writer.write_all(&[self.msg_type]).await?;
        writer.write_all(&self.payload).await?;
        writer.flush().await?;
        Ok(())
    }
}
