//! Frame encoding for the eDIP small protocol
//!
//! Frame formats:
//! - [`FrameFormat::Start`]: `DC1 (0x11)`, `LENGTH`, `PAYLOAD`, `CHECKSUM`
//! - [`FrameFormat::Continuation`]: `DC2 (0x12)`, `PAYLOAD`, `CHECKSUM`
//!
//! `CHECKSUM` is the unsigned 8-bit sum, with wraparound, of every byte
//! before it in the frame.

use heapless::Vec;

use crate::command::{DC1, DC2};

/// Maximum payload size in bytes
///
/// Bounded by the one-byte length field of a start frame.
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

/// Maximum complete frame size (HEADER + LENGTH + MAX_PAYLOAD + CHECKSUM)
pub const MAX_FRAME_SIZE: usize = 1 + 1 + MAX_PAYLOAD_SIZE + 1;

/// An encoded frame, ready to be written to the wire
pub type FrameBuffer = Vec<u8, MAX_FRAME_SIZE>;

/// Header layout of a frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameFormat {
    /// `DC1` header followed by an explicit length byte
    #[default]
    Start,
    /// `DC2` header, no length byte (compact/addressed mode)
    Continuation,
}

impl FrameFormat {
    /// Header byte that opens frames of this format
    pub const fn header(self) -> u8 {
        match self {
            Self::Start => DC1,
            Self::Continuation => DC2,
        }
    }
}

/// Errors that can occur during frame encoding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Payload exceeds [`MAX_PAYLOAD_SIZE`]
    PayloadTooLarge {
        /// Length of the rejected payload
        len: usize,
    },
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PayloadTooLarge { len } => write!(
                f,
                "Payload too large: {len} bytes (max {MAX_PAYLOAD_SIZE})"
            ),
        }
    }
}

impl core::error::Error for FrameError {}

/// 8-bit wrapping sum of `bytes`
///
/// Checksums compose: the checksum of a frame is the wrapping sum of the
/// checksums of its parts.
///
/// ```
/// use ediptft::frame::checksum;
///
/// assert_eq!(checksum(&[]), 0);
/// assert_eq!(checksum(&[0xFF, 0x02]), 0x01);
/// ```
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &byte| acc.wrapping_add(byte))
}

/// Encode `payload` into a complete frame of the given format
///
/// # Errors
///
/// Returns [`FrameError::PayloadTooLarge`] if the payload is longer than
/// [`MAX_PAYLOAD_SIZE`].
///
/// ```
/// use ediptft::frame::{encode, FrameFormat};
///
/// let frame = encode(FrameFormat::Start, &[0x1B, b'D', b'L'])?;
/// assert_eq!(frame.as_slice(), &[0x11, 3, 0x1B, b'D', b'L', 0x11 + 3 + 0x1B + b'D' + b'L']);
///
/// let frame = encode(FrameFormat::Continuation, &[0x01, b'I'])?;
/// assert_eq!(frame.as_slice(), &[0x12, 0x01, b'I', 0x12 + 0x01 + b'I']);
/// # Ok::<(), ediptft::frame::FrameError>(())
/// ```
pub fn encode(format: FrameFormat, payload: &[u8]) -> Result<FrameBuffer, FrameError> {
    let len = u8::try_from(payload.len())
        .map_err(|_| FrameError::PayloadTooLarge { len: payload.len() })?;

    let too_large = FrameError::PayloadTooLarge { len: payload.len() };

    let mut frame = FrameBuffer::new();
    frame.push(format.header()).map_err(|_| too_large)?;
    if format == FrameFormat::Start {
        frame.push(len).map_err(|_| too_large)?;
    }
    frame.extend_from_slice(payload).map_err(|_| too_large)?;
    let bcc = checksum(&frame);
    frame.push(bcc).map_err(|_| too_large)?;

    Ok(frame)
}
