//! eDIP small-protocol byte definitions
//!
//! This module defines the control bytes and the fixed payloads the link
//! layer itself needs. Everything else a display understands (drawing,
//! colours, touch keys, macros) is payload content assembled by the caller
//! and passed through [`Framer::send`](crate::Framer::send) untouched.
//!
//! ## Frame Structure
//!
//! Every framed transmission follows the pattern:
//! 1. Header byte ([`DC1`] or [`DC2`])
//! 2. Length byte (only after [`DC1`])
//! 3. Payload bytes, verbatim
//! 4. Checksum byte (8-bit sum of everything before it)
//!
//! The display answers each frame with a single [`ACK`] byte when the
//! checksum matched and its receive buffer had room.
//!
//! ## Example
//!
//! ```rust
//! use ediptft::{command, frame::checksum};
//!
//! // A select frame for the display at address 7, as it appears on the wire
//! let payload = command::select_device(7);
//! assert_eq!(payload, [0x03, b'A', b'S', 7]);
//!
//! let bcc = checksum(&[command::DC2]).wrapping_add(checksum(&payload));
//! assert_eq!(bcc, 0x12 + 0x03 + b'A' + b'S' + 7);
//! ```

// Frame headers

/// Start-frame header (0x11, DC1)
///
/// Followed by an explicit length byte, then the payload.
pub const DC1: u8 = 0x11;

/// Continuation-frame header (0x12, DC2)
///
/// Followed directly by the payload; no length byte. Used on shared,
/// addressed buses and for the link's own status queries.
pub const DC2: u8 = 0x12;

// Acknowledgment codes

/// Positive acknowledgment (0x06)
///
/// The only byte that ends a send successfully.
pub const ACK: u8 = 0x06;

/// Negative acknowledgment (0x15)
///
/// Sent by the display on checksum mismatch or buffer overflow. The link
/// treats it like any other non-[`ACK`] byte; it is named for logging.
pub const NAK: u8 = 0x15;

// Link-level queries

/// Buffer fill-level query payload (`{0x01, 'I'}`)
///
/// Reply layout: 2 bytes skipped, 1 fill-level byte, 2 bytes skipped.
pub const QUERY_BUFFER_FILL: [u8; 2] = [0x01, b'I'];

/// Send-buffer read payload (`{0x01, 'S'}`)
///
/// Reply layout: 1 length byte, that many data bytes, 1 trailing byte.
pub const QUERY_SEND_BUFFER: [u8; 2] = [0x01, b'S'];

/// Reply bytes preceding the fill-level byte
pub const FILL_REPLY_LEADING: usize = 2;

/// Reply bytes following the fill-level byte
pub const FILL_REPLY_TRAILING: usize = 2;

/// Reply bytes following the send-buffer data
pub const SEND_BUFFER_REPLY_TRAILING: usize = 1;

// Bus addressing

/// Select the addressed device (`'A','S'`)
pub const ADDRESS_SELECT: u8 = b'S';

/// Deselect the addressed device (`'A','D'`)
pub const ADDRESS_DESELECT: u8 = b'D';

/// Build the 4-byte payload selecting `address` on a shared bus
pub const fn select_device(address: u8) -> [u8; 4] {
    [0x03, b'A', ADDRESS_SELECT, address]
}

/// Build the 4-byte payload deselecting `address` on a shared bus
pub const fn deselect_device(address: u8) -> [u8; 4] {
    [0x03, b'A', ADDRESS_DESELECT, address]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addressing_payloads() {
        assert_eq!(select_device(0x2A), [0x03, 0x41, 0x53, 0x2A]);
        assert_eq!(deselect_device(0x2A), [0x03, 0x41, 0x44, 0x2A]);
    }

    #[test]
    fn test_query_payloads() {
        assert_eq!(QUERY_BUFFER_FILL, [0x01, 0x49]);
        assert_eq!(QUERY_SEND_BUFFER, [0x01, 0x53]);
    }
}
