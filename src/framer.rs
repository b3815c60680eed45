//! Framed, acknowledged transfers to the display
//!
//! [`Framer`] wraps caller payloads in small-protocol frames, waits for the
//! display's acknowledgment and resends until it arrives. It also runs the
//! two link-level status queries.
//!
//! ## Blocking contract
//!
//! With the default [`Config`] every operation blocks the calling thread
//! until the display answers, with no timeout and no retry limit. A display
//! that is absent or permanently faulty makes [`Framer::send`] never return.
//! Set [`Builder::response_timeout_ms`](crate::Builder::response_timeout_ms)
//! and [`Builder::max_attempts`](crate::Builder::max_attempts) to bound it.

use embedded_hal::delay::DelayNs;

use crate::command::{
    ACK, FILL_REPLY_LEADING, FILL_REPLY_TRAILING, NAK, QUERY_BUFFER_FILL, QUERY_SEND_BUFFER,
    SEND_BUFFER_REPLY_TRAILING,
};
use crate::config::Config;
use crate::error::Error;
use crate::frame::{self, FrameFormat, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
use crate::interface::SerialInterface;

type LinkResult<T, I> = core::result::Result<T, Error<I>>;

/// Data read back from the display's send buffer
///
/// Holds up to 255 bytes, the most a one-byte length prefix can announce.
pub type ResponseBuffer = heapless::Vec<u8, MAX_PAYLOAD_SIZE>;

/// Outcome of waiting for the byte that follows a frame
#[derive(Clone, Copy, Debug, PartialEq)]
enum Acknowledgment {
    /// The display answered [`ACK`]
    Accepted,
    /// The display answered with something else
    Rejected(u8),
    /// Nothing arrived
    Silent,
}

/// Small-protocol link to one display
///
/// Owns the serial interface for its whole lifetime; every operation takes
/// `&mut self`, so the channel is never shared.
pub struct Framer<I>
where
    I: SerialInterface,
{
    /// Byte transport
    interface: I,
    /// Link configuration
    config: Config,
}

impl<I> Framer<I>
where
    I: SerialInterface,
{
    /// Create a new Framer instance
    pub fn new(interface: I, config: Config) -> Self {
        Self { interface, config }
    }

    /// Open the interface at the configured baud rate
    pub fn begin(&mut self) -> LinkResult<(), I> {
        self.interface
            .open(self.config.baud_rate)
            .map_err(Error::Interface)?;
        log::debug!("serial link opened at {} baud", self.config.baud_rate);
        Ok(())
    }

    /// Send a payload and wait until the display acknowledges it
    ///
    /// The frame format follows [`Config::compact_mode`]. On any reply other
    /// than [`ACK`] the identical frame is sent again.
    ///
    /// # Blocking
    ///
    /// With the default configuration this only returns once the display
    /// accepted the frame, or on an interface error.
    ///
    /// # Errors
    ///
    /// - [`Error::PayloadTooLarge`] if `payload` exceeds 255 bytes
    /// - [`Error::RetriesExhausted`] if a retry limit is configured and reached
    /// - [`Error::Interface`] on UART failure
    pub fn send<D: DelayNs>(&mut self, payload: &[u8], delay: &mut D) -> LinkResult<(), I> {
        self.send_framed(self.config.frame_format(), payload, delay)
    }

    /// Send a framed payload without waiting for an acknowledgment
    ///
    /// Any reply the display sends stays in the receive buffer.
    pub fn send_unacknowledged(&mut self, payload: &[u8]) -> LinkResult<(), I> {
        let frame = frame::encode(self.config.frame_format(), payload)?;
        self.write_frame(&frame)
    }

    /// Write bytes to the display without framing
    ///
    /// For displays whose small protocol is switched off; such displays
    /// interpret the raw command stream directly and never acknowledge.
    pub fn send_raw(&mut self, bytes: &[u8]) -> LinkResult<(), I> {
        log::trace!("raw {:02X?}", bytes);
        self.interface.send_bytes(bytes).map_err(Error::Interface)?;
        self.interface.flush().map_err(Error::Interface)
    }

    /// Select the display at `address` on a shared bus
    ///
    /// Always sent as a compact (`DC2`) frame, whatever the configured mode.
    pub fn select_device<D: DelayNs>(&mut self, address: u8, delay: &mut D) -> LinkResult<(), I> {
        let payload = crate::command::select_device(address);
        self.send_framed(FrameFormat::Continuation, &payload, delay)
    }

    /// Deselect the display at `address` on a shared bus
    pub fn deselect_device<D: DelayNs>(
        &mut self,
        address: u8,
        delay: &mut D,
    ) -> LinkResult<(), I> {
        let payload = crate::command::deselect_device(address);
        self.send_framed(FrameFormat::Continuation, &payload, delay)
    }

    /// Ask the display how full its receive buffer is
    ///
    /// Returns the fill-level byte from the reply.
    ///
    /// # Blocking
    ///
    /// Each reply byte is awaited individually. Without a response timeout a
    /// reply cut short stalls this call indefinitely.
    pub fn query_buffer_fill_level<D: DelayNs>(&mut self, delay: &mut D) -> LinkResult<u8, I> {
        self.send_framed(FrameFormat::Continuation, &QUERY_BUFFER_FILL, delay)?;
        self.skip_reply_bytes(FILL_REPLY_LEADING, delay)?;
        let level = self.read_reply_byte(delay)?;
        self.skip_reply_bytes(FILL_REPLY_TRAILING, delay)?;
        Ok(level)
    }

    /// Read the contents of the display's send buffer
    ///
    /// The reply is a length byte followed by that many data bytes and one
    /// trailing byte, which is discarded. The count is the buffer's `len()`.
    ///
    /// # Blocking
    ///
    /// Same as [`query_buffer_fill_level`](Self::query_buffer_fill_level).
    pub fn read_response_buffer<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> LinkResult<ResponseBuffer, I> {
        self.send_framed(FrameFormat::Continuation, &QUERY_SEND_BUFFER, delay)?;

        let len = self.read_reply_byte(delay)?;
        let mut data = ResponseBuffer::new();
        for _ in 0..len {
            let byte = self.read_reply_byte(delay)?;
            // Capacity is 255 and `len` is a u8
            let pushed = data.push(byte).is_ok();
            debug_assert!(pushed, "reply longer than ResponseBuffer");
        }
        self.skip_reply_bytes(SEND_BUFFER_REPLY_TRAILING, delay)?;

        log::debug!("send buffer returned {} bytes", data.len());
        Ok(data)
    }

    /// Get the link configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Direct access to the interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Consume the framer and return the interface
    pub fn release(self) -> I {
        self.interface
    }

    fn send_framed<D: DelayNs>(
        &mut self,
        format: FrameFormat,
        payload: &[u8],
        delay: &mut D,
    ) -> LinkResult<(), I> {
        let frame = frame::encode(format, payload)?;
        self.transmit_until_acknowledged(&frame, delay)
    }

    fn transmit_until_acknowledged<D: DelayNs>(
        &mut self,
        frame: &[u8],
        delay: &mut D,
    ) -> LinkResult<(), I> {
        let mut attempts = 0u32;

        loop {
            attempts = attempts.saturating_add(1);
            self.discard_stale_input()?;
            self.write_frame(frame)?;

            let outcome = self.await_acknowledgment(delay)?;
            match outcome {
                Acknowledgment::Accepted => {
                    if attempts > 1 {
                        log::debug!("frame accepted after {} attempts", attempts);
                    }
                    return Ok(());
                }
                Acknowledgment::Rejected(NAK) => log::warn!("display sent NAK"),
                Acknowledgment::Rejected(byte) => {
                    log::warn!("expected ACK, display sent 0x{:02X}", byte);
                }
                Acknowledgment::Silent => log::warn!("no reply from display"),
            }

            if self.config.max_attempts != 0 && attempts >= self.config.max_attempts {
                log::warn!("giving up after {} attempts", attempts);
                return Err(Error::RetriesExhausted { attempts });
            }

            if outcome == Acknowledgment::Silent {
                delay.delay_ms(self.config.quiescence_ms);
            }
        }
    }

    /// Drop bytes received before the next frame goes out
    ///
    /// Late acknowledgments and unread replies would otherwise be taken as
    /// the answer to the new frame. Stops after one frame's worth of bytes
    /// so a chattering line cannot hold the sender here.
    fn discard_stale_input(&mut self) -> LinkResult<(), I> {
        let mut discarded = 0usize;
        while discarded < MAX_FRAME_SIZE
            && self.interface.bytes_available().map_err(Error::Interface)? > 0
        {
            match self.interface.read_byte().map_err(Error::Interface)? {
                Some(byte) => {
                    log::trace!("stale {:02X}", byte);
                    discarded += 1;
                }
                None => break,
            }
        }
        if discarded > 0 {
            log::warn!("dropped {} stale bytes before sending", discarded);
        }
        Ok(())
    }

    fn write_frame(&mut self, frame: &[u8]) -> LinkResult<(), I> {
        log::trace!("tx {:02X?}", frame);
        self.interface.send_bytes(frame).map_err(Error::Interface)?;
        self.interface.flush().map_err(Error::Interface)
    }

    fn await_acknowledgment<D: DelayNs>(&mut self, delay: &mut D) -> LinkResult<Acknowledgment, I> {
        if !self.wait_for_byte(delay)? {
            return Ok(Acknowledgment::Silent);
        }
        let ack = match self.interface.read_byte().map_err(Error::Interface)? {
            Some(ACK) => Acknowledgment::Accepted,
            Some(byte) => Acknowledgment::Rejected(byte),
            None => Acknowledgment::Silent,
        };
        Ok(ack)
    }

    /// Wait for the next byte, honouring the response timeout
    ///
    /// Returns `false` only when a timeout is configured and expired.
    fn wait_for_byte<D: DelayNs>(&mut self, delay: &mut D) -> LinkResult<bool, I> {
        if self.config.waits_forever() {
            self.interface
                .wait_until_available()
                .map_err(Error::Interface)?;
            Ok(true)
        } else {
            self.interface
                .wait_until_available_for(delay, self.config.response_timeout_ms)
                .map_err(Error::Interface)
        }
    }

    fn read_reply_byte<D: DelayNs>(&mut self, delay: &mut D) -> LinkResult<u8, I> {
        loop {
            if !self.wait_for_byte(delay)? {
                return Err(Error::Timeout);
            }
            if let Some(byte) = self.interface.read_byte().map_err(Error::Interface)? {
                log::trace!("rx {:02X}", byte);
                return Ok(byte);
            }
        }
    }

    fn skip_reply_bytes<D: DelayNs>(&mut self, count: usize, delay: &mut D) -> LinkResult<(), I> {
        for _ in 0..count {
            self.read_reply_byte(delay)?;
        }
        Ok(())
    }
}
