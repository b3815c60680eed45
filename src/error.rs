//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and link operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during link operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level UART errors
//!
//! Negative or missing acknowledgments are not errors: the framer resends
//! until the display accepts the frame. They only surface, as
//! [`Error::RetriesExhausted`] or [`Error::Timeout`], when a bounded retry
//! policy was configured.
//!
//! ## Example
//!
//! ```
//! use ediptft::{Builder, BuilderError};
//!
//! let result = Builder::new().baud_rate(0).build();
//! assert!(matches!(result, Err(BuilderError::InvalidBaudRate(0))));
//! ```

use crate::frame::{FrameError, MAX_PAYLOAD_SIZE};
use crate::interface::SerialInterface;

/// Errors that can occur when talking to the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
#[derive(Debug)]
pub enum Error<I: SerialInterface> {
    /// Interface error (UART)
    ///
    /// Wraps the underlying hardware error from the [`SerialInterface`] implementation.
    Interface(I::Error),
    /// Payload does not fit in a single frame
    ///
    /// Payloads are limited to [`MAX_PAYLOAD_SIZE`] (255) bytes.
    PayloadTooLarge {
        /// Length of the rejected payload
        len: usize,
        /// Largest accepted payload
        max: usize,
    },
    /// A reply byte did not arrive within the configured response timeout
    ///
    /// Only returned when [`Config::response_timeout_ms`](crate::Config::response_timeout_ms)
    /// is non-zero.
    Timeout,
    /// The display did not acknowledge the frame within the attempt limit
    ///
    /// Only returned when [`Config::max_attempts`](crate::Config::max_attempts)
    /// is non-zero.
    RetriesExhausted {
        /// Number of times the frame was transmitted
        attempts: u32,
    },
}

impl<I: SerialInterface> From<FrameError> for Error<I> {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::PayloadTooLarge { len } => Self::PayloadTooLarge {
                len,
                max: MAX_PAYLOAD_SIZE,
            },
        }
    }
}

impl<I: SerialInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::PayloadTooLarge { len, max } => {
                write!(f, "Payload too large: {len} bytes (max {max})")
            }
            Self::Timeout => write!(f, "Timeout waiting for display reply"),
            Self::RetriesExhausted { attempts } => {
                write!(f, "Display did not acknowledge after {attempts} attempts")
            }
        }
    }
}

impl<I: SerialInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the framer is created.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Baud rate must be non-zero
    InvalidBaudRate(u32),
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidBaudRate(baud) => write!(f, "Invalid baud rate: {baud}"),
        }
    }
}

impl core::error::Error for BuilderError {}
