//! eDIP TFT Serial Link Driver
//!
//! A driver for the serial "small protocol" of Electronic Assembly eDIP TFT
//! displays: framing, checksums, acknowledgment and retry over a UART, plus
//! the protocol's two status queries.
//!
//! Drawing, colour, touch and macro commands are plain byte strings; build
//! them however you like and hand them to [`Framer::send`].
//!
//! ## Features
//!
//! - `no_std` compatible, no allocator required
//! - `embedded-hal` v1.0 delays, `embedded-io` UARTs
//! - Start (`DC1` + length) and compact (`DC2`, addressed bus) frames
//! - Resend until acknowledged, with optional timeout and retry limit
//!
//! ## Blocking
//!
//! By default every send and query blocks until the display answers, with no
//! timeout. See [`Builder::response_timeout_ms`] and [`Builder::max_attempts`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use ediptft::{Builder, Framer, Interface};
//! # use core::convert::Infallible;
//! # struct MockUart;
//! # impl embedded_io::ErrorType for MockUart { type Error = Infallible; }
//! # impl embedded_io::Read for MockUart {
//! #     fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> { buf[0] = 0x06; Ok(1) }
//! # }
//! # impl embedded_io::ReadReady for MockUart {
//! #     fn read_ready(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # impl embedded_io::Write for MockUart {
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let uart = MockUart;
//! # let mut delay = MockDelay;
//! let config = match Builder::new().baud_rate(115_200).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Framer::new(Interface::new(uart), config);
//! let _ = display.begin();
//!
//! // ESC D L: clear the screen
//! let _ = display.send(&[0x1B, b'D', b'L'], &mut delay);
//!
//! // How much room is left in the display's receive buffer?
//! let _level = display.query_buffer_fill_level(&mut delay);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// eDIP small-protocol byte definitions
pub mod command;
/// Link configuration types and builder
pub mod config;
/// Error types for the driver
pub mod error;
/// Frame encoding
pub mod frame;
/// Framed, acknowledged transfers
pub mod framer;
/// Hardware interface abstraction
pub mod interface;

pub use config::{Builder, Config, DEFAULT_QUIESCENCE_MS};
pub use error::{BuilderError, Error};
pub use frame::{FrameError, FrameFormat, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use framer::{Framer, ResponseBuffer};
pub use interface::InterfaceError;
pub use interface::{DEFAULT_BAUD_RATE, Interface, SerialInterface};
