//! Boundary to the remote-framebuffer protocol client.
//!
//! The wire protocol lives in whatever client backs [`RemoteSession`]. The
//! viewer drives it from the render loop and hands the input pump a separate
//! [`EventSink`], so the two threads never share the session object.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::input::keysym::Keysym;

/// Input event headed to the remote session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEvent {
    Key {
        keysym: Keysym,
        down: bool,
    },
    Pointer {
        x: u16,
        y: u16,
        /// Bit 0 = left, bit 1 = middle, bit 2 = right.
        button_mask: u8,
    },
}

/// Writer half of a session, owned by the input pump.
pub trait EventSink: Send {
    fn send(&mut self, event: RemoteEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl EventSink for mpsc::Sender<RemoteEvent> {
    fn send(&mut self, event: RemoteEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        mpsc::Sender::send(self, event).map_err(|_| "remote session closed".into())
    }
}

/// Pixel layout the viewer asks the server for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub width: u16,
    pub height: u16,
    pub bits_per_pixel: u8,
    pub red_shift: u8,
    pub green_shift: u8,
    pub blue_shift: u8,
    pub red_max: u16,
    pub green_max: u16,
    pub blue_max: u16,
}

impl PixelFormat {
    /// 32-bit xRGB, 8 bits per channel.
    pub fn rgb888(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            bits_per_pixel: 32,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
        }
    }
}

/// Damaged region reported with a frame update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Callbacks the session invokes while the viewer is inside `init` or
/// `handle_message`. They always run on the render loop's thread.
pub trait SessionHandler {
    /// The server announced (or changed) its framebuffer size.
    fn allocate_framebuffer(&mut self, width: u16, height: u16) -> PixelFormat;
    /// Buffer the session decodes pixels into.
    fn back_buffer(&mut self) -> &mut [u32];
    /// A rectangle of the back buffer now holds new pixels.
    fn frame_updated(&mut self, rect: Rect);
    /// Credential supplier for servers that ask for a password.
    fn password(&mut self) -> Option<String>;
}

pub trait RemoteSession {
    /// Complete the handshake and allocate the framebuffer.
    fn init(&mut self, handler: &mut dyn SessionHandler) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Wait up to `timeout` for a server message. `Ok(false)` is a quiet timeout.
    fn wait_for_message(&mut self, timeout: Duration) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Process one pending server message.
    fn handle_message(&mut self, handler: &mut dyn SessionHandler) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// A sink for input events that can be moved to another thread.
    fn event_sink(&mut self) -> Box<dyn EventSink>;
}

/// Session used when no protocol backend is linked in: it accepts input
/// events and logs them, and never receives server messages. `init` hands
/// the viewer one blank frame of the requested size.
pub struct DryRunSession {
    address: String,
    width: u16,
    height: u16,
}

impl DryRunSession {
    pub fn new(address: &str, width: u16, height: u16) -> Self {
        Self {
            address: address.into(),
            width,
            height,
        }
    }
}

struct LogSink {
    address: String,
    count: u64,
}

impl EventSink for LogSink {
    fn send(&mut self, event: RemoteEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.count += 1;
        log::info!("[dry-run] {} <- {:?}", self.address, event);
        if self.count.is_multiple_of(500) {
            log::debug!("[dry-run] events sent: {}", self.count);
        }
        Ok(())
    }
}

impl RemoteSession for DryRunSession {
    fn init(&mut self, handler: &mut dyn SessionHandler) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let credential = handler.password().is_some();
        log::debug!("[dry-run] password supplied: {}", credential);

        let format = handler.allocate_framebuffer(self.width, self.height);
        log::warn!(
            "No protocol backend linked; dry-run session for {} ({}x{}, {} bpp)",
            self.address,
            format.width,
            format.height,
            format.bits_per_pixel
        );
        log::debug!(
            "[dry-run] shifts r{} g{} b{}, max r{} g{} b{}",
            format.red_shift,
            format.green_shift,
            format.blue_shift,
            format.red_max,
            format.green_max,
            format.blue_max
        );

        handler.back_buffer().fill(0);
        handler.frame_updated(Rect {
            x: 0,
            y: 0,
            width: format.width,
            height: format.height,
        });
        Ok(())
    }

    fn wait_for_message(&mut self, timeout: Duration) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        thread::sleep(timeout);
        Ok(false)
    }

    fn handle_message(&mut self, _handler: &mut dyn SessionHandler) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }

    fn event_sink(&mut self) -> Box<dyn EventSink> {
        Box::new(LogSink {
            address: self.address.clone(),
            count: 0,
        })
    }
}
