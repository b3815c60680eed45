//! A display that never acknowledges keeps `send` pending forever.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use ediptft::command::NAK;
use ediptft::{Builder, Framer, SerialInterface};
use embedded_hal::delay::DelayNs;

const DEADLINE: Duration = Duration::from_millis(500);

struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Answers every frame with NAK
struct RejectingDisplay {
    frames: Arc<AtomicUsize>,
    answered: bool,
}

impl SerialInterface for RejectingDisplay {
    type Error = Infallible;

    fn send_byte(&mut self, _byte: u8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.frames.fetch_add(1, Ordering::SeqCst);
        self.answered = true;
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        Ok(usize::from(self.answered))
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let answered = std::mem::take(&mut self.answered);
        Ok(answered.then_some(NAK))
    }

    fn wait_until_available(&mut self) -> Result<(), Self::Error> {
        thread::sleep(Duration::from_millis(1));
        Ok(())
    }
}

/// Never sends a single byte
struct AbsentDisplay;

impl SerialInterface for AbsentDisplay {
    type Error = Infallible;

    fn send_byte(&mut self, _byte: u8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(None)
    }

    fn wait_until_available(&mut self) -> Result<(), Self::Error> {
        loop {
            thread::park();
        }
    }
}

fn spawn_send<I>(interface: I) -> mpsc::Receiver<bool>
where
    I: SerialInterface + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let config = Builder::new().build().unwrap();
        let mut framer = Framer::new(interface, config);
        let result = framer.send(&[0x1B, b'D', b'L'], &mut NoopDelay);
        let _ = tx.send(result.is_ok());
    });
    rx
}

#[test]
fn send_keeps_retrying_while_display_rejects() {
    let frames = Arc::new(AtomicUsize::new(0));
    let rx = spawn_send(RejectingDisplay {
        frames: Arc::clone(&frames),
        answered: false,
    });

    assert_eq!(
        rx.recv_timeout(DEADLINE),
        Err(mpsc::RecvTimeoutError::Timeout)
    );
    assert!(frames.load(Ordering::SeqCst) > 1);
}

#[test]
fn send_blocks_while_display_is_silent() {
    let rx = spawn_send(AbsentDisplay);

    assert_eq!(
        rx.recv_timeout(DEADLINE),
        Err(mpsc::RecvTimeoutError::Timeout)
    );
}
