//! Hardware interface abstraction
//!
//! This module provides the [`SerialInterface`] trait and the [`Interface`] struct
//! for moving raw bytes between the host and the display over a UART.
//!
//! ## Hardware Requirements
//!
//! The eDIP small protocol only needs a full-duplex UART (TX + RX, 8N1).
//! The baud rate must match the one selected on the display's configuration
//! pins.
//!
//! ## Blocking
//!
//! [`SerialInterface::wait_until_available`] has no timeout. The provided
//! [`Interface`] implements it with the UART's blocking `read`, so the wait is
//! whatever the HAL does while idle (interrupt wait, OS read) rather than a
//! spin on [`SerialInterface::bytes_available`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use ediptft::{Interface, SerialInterface};
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
//! // Wrap any embedded-io UART
//! let mut interface = Interface::new(MockUart);
//! let _ = interface.open(115_200);
//!
//! // Send raw bytes
//! let _ = interface.send_byte(0x12);
//!
//! // Wait for the display to answer
//! let _ = interface.wait_until_available();
//! let _reply = interface.read_byte();
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::frame::MAX_FRAME_SIZE;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for the byte transport underneath the framer
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Framer`](crate::framer::Framer) to work with any serial
/// channel. It carries no framing knowledge.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct over an embedded-io
/// UART. Implement this trait directly for channels that expose a receive
/// buffer count, or for test doubles.
pub trait SerialInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Configure and activate the channel
    ///
    /// Called once by [`Framer::begin`](crate::Framer::begin). The default
    /// does nothing, for channels configured when the HAL constructed them.
    fn open(&mut self, baud_rate: u32) -> InterfaceResult<(), Self::Error> {
        let _ = baud_rate;
        Ok(())
    }

    /// Write one byte, blocking until the channel accepts it
    fn send_byte(&mut self, byte: u8) -> InterfaceResult<(), Self::Error>;

    /// Write a run of bytes
    ///
    /// Defaults to one [`send_byte`](Self::send_byte) per byte.
    fn send_bytes(&mut self, bytes: &[u8]) -> InterfaceResult<(), Self::Error> {
        for &byte in bytes {
            self.send_byte(byte)?;
        }
        Ok(())
    }

    /// Block until all written bytes have left the transmitter
    fn flush(&mut self) -> InterfaceResult<(), Self::Error> {
        Ok(())
    }

    /// Number of received bytes ready to read, without blocking
    ///
    /// May be a lower bound; callers only rely on zero vs. non-zero.
    fn bytes_available(&mut self) -> InterfaceResult<usize, Self::Error>;

    /// Take one received byte
    ///
    /// Returns `None` when nothing is buffered. Never blocks.
    fn read_byte(&mut self) -> InterfaceResult<Option<u8>, Self::Error>;

    /// Block until at least one byte is available
    ///
    /// No timeout: if the peer never sends, this never returns.
    fn wait_until_available(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Wait up to `timeout_ms` for at least one byte
    ///
    /// Returns `true` once a byte is available, `false` on timeout. The
    /// default polls [`bytes_available`](Self::bytes_available) once per
    /// millisecond.
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay implementation for the polling interval
    /// * `timeout_ms` - Upper bound on the wait
    fn wait_until_available_for<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timeout_ms: u32,
    ) -> InterfaceResult<bool, Self::Error> {
        let mut waited_ms = 0u32;
        loop {
            if self.bytes_available()? > 0 {
                return Ok(true);
            }
            if waited_ms >= timeout_ms {
                return Ok(false);
            }
            delay.delay_ms(1);
            waited_ms += 1;
        }
    }
}

/// Errors that can occur at the interface level
///
/// Generic over the UART error type.
#[derive(Debug)]
pub enum InterfaceError<UartErr> {
    /// UART communication error
    Uart(UartErr),
    /// The UART's blocking read returned no data
    EndOfStream,
}

impl<UartErr: Debug> core::fmt::Display for InterfaceError<UartErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Uart(e) => write!(f, "UART error: {e:?}"),
            Self::EndOfStream => write!(f, "UART read returned end of stream"),
        }
    }
}

impl<UartErr: Debug> core::error::Error for InterfaceError<UartErr> {}

/// Default baud rate of eDIP TFT displays
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Serial interface implementation over embedded-io
///
/// Implements [`SerialInterface`] for any UART implementing the embedded-io
/// [`Read`], [`ReadReady`] and [`Write`] traits.
///
/// embedded-io only reports whether data is ready, not how much, and its
/// blocking `read` consumes what it waits for. The interface therefore keeps
/// a one-byte look-ahead: [`wait_until_available`](SerialInterface::wait_until_available)
/// blocks in `read` and parks the byte there for the next
/// [`read_byte`](SerialInterface::read_byte).
///
/// ## Type Parameters
///
/// * `UART` - Serial port implementing [`Read`] + [`ReadReady`] + [`Write`]
#[derive(Debug)]
pub struct Interface<UART> {
    /// Serial port
    uart: UART,
    /// Byte received by a blocking wait and not yet handed out
    lookahead: Option<u8>,
    /// Baud rate passed to the last `open`
    baud_rate: u32,
}

impl<UART> Interface<UART>
where
    UART: Read + ReadReady + Write,
{
    /// Create a new Interface
    ///
    /// The UART must already be configured for the display's baud rate.
    pub fn new(uart: UART) -> Self {
        Self {
            uart,
            lookahead: None,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }

    /// Baud rate recorded by the last [`open`](SerialInterface::open)
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Consume the interface and return the UART
    ///
    /// A byte held in the look-ahead slot is lost.
    pub fn release(self) -> UART {
        self.uart
    }

    fn read_one(&mut self) -> InterfaceResult<u8, InterfaceError<UART::Error>> {
        let mut buf = [0u8; 1];
        match self.uart.read(&mut buf).map_err(InterfaceError::Uart)? {
            0 => Err(InterfaceError::EndOfStream),
            _ => Ok(buf[0]),
        }
    }
}

impl<UART> SerialInterface for Interface<UART>
where
    UART: Read + ReadReady + Write,
{
    type Error = InterfaceError<UART::Error>;

    fn open(&mut self, baud_rate: u32) -> InterfaceResult<(), Self::Error> {
        self.baud_rate = baud_rate;
        self.lookahead = None;

        // Drop whatever the display sent before we were listening, at most
        // one frame's worth so a chattering line cannot stall startup
        let mut discarded = 0usize;
        while discarded < MAX_FRAME_SIZE
            && self.uart.read_ready().map_err(InterfaceError::Uart)?
        {
            self.read_one()?;
            discarded += 1;
        }
        if discarded > 0 {
            log::debug!("discarded {} stale bytes on open", discarded);
        }
        Ok(())
    }

    fn send_byte(&mut self, byte: u8) -> InterfaceResult<(), Self::Error> {
        self.uart.write_all(&[byte]).map_err(InterfaceError::Uart)
    }

    fn send_bytes(&mut self, bytes: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.uart.write_all(bytes).map_err(InterfaceError::Uart)
    }

    fn flush(&mut self) -> InterfaceResult<(), Self::Error> {
        self.uart.flush().map_err(InterfaceError::Uart)
    }

    fn bytes_available(&mut self) -> InterfaceResult<usize, Self::Error> {
        let ready = self.uart.read_ready().map_err(InterfaceError::Uart)?;
        Ok(usize::from(self.lookahead.is_some()) + usize::from(ready))
    }

    fn read_byte(&mut self) -> InterfaceResult<Option<u8>, Self::Error> {
        if let Some(byte) = self.lookahead.take() {
            return Ok(Some(byte));
        }
        if !self.uart.read_ready().map_err(InterfaceError::Uart)? {
            return Ok(None);
        }
        self.read_one().map(Some)
    }

    fn wait_until_available(&mut self) -> InterfaceResult<(), Self::Error> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.read_one()?);
        }
        Ok(())
    }
}
