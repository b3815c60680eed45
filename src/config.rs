//! Link configuration types and builder

pub use crate::error::BuilderError;
use crate::frame::FrameFormat;
use crate::interface::DEFAULT_BAUD_RATE;

/// Default wait after a silent display before resending, in milliseconds
pub const DEFAULT_QUIESCENCE_MS: u32 = 2_000;

/// Link configuration
///
/// This struct holds all configurable parameters of the framing layer.
/// Use `Builder` to create a Config.
///
/// The defaults reproduce the classic small-protocol behaviour: wait for a
/// reply forever and resend until the display acknowledges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Frame application payloads with `DC2` instead of `DC1` + length
    pub compact_mode: bool,
    /// Baud rate handed to the interface on `begin`
    pub baud_rate: u32,
    /// Time to wait for each reply byte, in milliseconds (0 = forever)
    pub response_timeout_ms: u32,
    /// Pause after a timed-out acknowledgment before resending
    pub quiescence_ms: u32,
    /// Transmissions per frame before giving up (0 = unlimited)
    pub max_attempts: u32,
}

impl Config {
    /// Frame format used for application payloads
    pub fn frame_format(&self) -> FrameFormat {
        if self.compact_mode {
            FrameFormat::Continuation
        } else {
            FrameFormat::Start
        }
    }

    /// Whether replies are waited for without a deadline
    pub fn waits_forever(&self) -> bool {
        self.response_timeout_ms == 0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compact_mode: false,
            baud_rate: DEFAULT_BAUD_RATE,
            response_timeout_ms: 0,
            quiescence_ms: DEFAULT_QUIESCENCE_MS,
            max_attempts: 0,
        }
    }
}

/// Builder for constructing link configuration
///
/// # Example
///
/// ```rust
/// use ediptft::{Builder, frame::FrameFormat};
///
/// let config = match Builder::new().compact_mode(true).baud_rate(57_600).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.frame_format(), FrameFormat::Continuation);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Select compact (`DC2`, addressed bus) framing for application payloads
    pub fn compact_mode(mut self, value: bool) -> Self {
        self.config.compact_mode = value;
        self
    }

    /// Set the baud rate passed to the interface on `begin`
    pub fn baud_rate(mut self, value: u32) -> Self {
        self.config.baud_rate = value;
        self
    }

    /// Bound the wait for each reply byte
    ///
    /// Default is 0, which waits forever. With a non-zero value a missing
    /// acknowledgment triggers a resend after the quiescence window, and a
    /// missing status-reply byte fails with [`Error::Timeout`](crate::Error::Timeout).
    pub fn response_timeout_ms(mut self, value: u32) -> Self {
        self.config.response_timeout_ms = value;
        self
    }

    /// Set the pause after a timed-out acknowledgment
    ///
    /// Default is 2,000ms. Only used when a response timeout is set.
    pub fn quiescence_ms(mut self, value: u32) -> Self {
        self.config.quiescence_ms = value;
        self
    }

    /// Cap the number of transmissions per frame
    ///
    /// Default is 0, which resends until the display acknowledges.
    pub fn max_attempts(mut self, value: u32) -> Self {
        self.config.max_attempts = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidBaudRate` if the baud rate is zero
    pub fn build(self) -> Result<Config, BuilderError> {
        if self.config.baud_rate == 0 {
            return Err(BuilderError::InvalidBaudRate(self.config.baud_rate));
        }
        Ok(self.config)
    }
}
