//! The render loop: drives the remote session on the main thread, presents
//! new frames, and owns the lifecycle of the input and display pumps.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::display::{self, Display, Presenter, RenderParams};
use crate::flags::{SessionFlags, SharedFlags};
use crate::framebuffer::Framebuffers;
use crate::input::pump::{self, InputSettings};
use crate::session::{PixelFormat, Rect, RemoteSession, SessionHandler};

/// Why the render loop stopped.
#[derive(Debug)]
pub enum Shutdown {
    /// The running flag was cleared.
    Requested,
    /// Waiting for or handling a server message failed, or the server closed.
    Session(Box<dyn std::error::Error + Send + Sync>),
}

/// Callback target handed to the session; borrows the render loop's state.
struct FrameHandler<'a> {
    frames: &'a mut Framebuffers,
    password: Option<&'a str>,
}

impl SessionHandler for FrameHandler<'_> {
    fn allocate_framebuffer(&mut self, width: u16, height: u16) -> PixelFormat {
        let format = self.frames.format();
        if (width, height) != (format.width, format.height) {
            log::info!(
                "Server framebuffer is {}x{}; requesting {}x{}",
                width,
                height,
                format.width,
                format.height
            );
        }
        format
    }

    fn back_buffer(&mut self) -> &mut [u32] {
        self.frames.back_mut()
    }

    fn frame_updated(&mut self, rect: Rect) {
        if !self.frames.check_rect(rect) {
            log::warn!("Update {:?} outside the framebuffer", rect);
        }
        self.frames.mark_dirty();
    }

    fn password(&mut self) -> Option<String> {
        if self.password.is_none() {
            log::warn!("Server asked for a password but none is configured");
        }
        self.password.map(String::from)
    }
}

pub struct Viewer<S, P> {
    session: S,
    presenter: P,
    frames: Framebuffers,
    flags: SharedFlags,
    password: Option<String>,
    wait_timeout: Duration,
    pumps: Vec<JoinHandle<()>>,
}

impl<S: RemoteSession, P: Presenter> Viewer<S, P> {
    pub fn new(session: S, presenter: P, width: u16, height: u16) -> Self {
        Self {
            session,
            presenter,
            frames: Framebuffers::new(width, height),
            flags: Arc::new(SessionFlags::new()),
            password: None,
            wait_timeout: Duration::from_millis(500),
            pumps: Vec::new(),
        }
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Prepare the GPU pipeline, complete the session handshake and mark the
    /// display ready. A pipeline failure is logged and rendering carries on
    /// without it; a handshake failure is fatal.
    pub fn start(&mut self, params: &RenderParams) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Err(e) = self.presenter.prepare(params) {
            log::error!("Render pipeline setup failed, frames will not show: {}", e);
        }

        let mut handler = FrameHandler {
            frames: &mut self.frames,
            password: self.password.as_deref(),
        };
        self.session.init(&mut handler)?;

        self.flags.set_ready(true);
        Ok(())
    }

    /// Spawn the display pump.
    pub fn spawn_display(&mut self, display: Box<dyn Display>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let flags = self.flags.clone();
        let handle = thread::Builder::new()
            .name("display".into())
            .spawn(move || display::run_display(display, flags))?;
        self.pumps.push(handle);
        Ok(())
    }

    /// Spawn the input pump writing into the session's event sink.
    pub fn spawn_input(&mut self, settings: InputSettings) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let sink = self.session.event_sink();
        let flags = self.flags.clone();
        let handle = thread::Builder::new()
            .name("input".into())
            .spawn(move || pump::run_input(settings, sink, flags))?;
        self.pumps.push(handle);
        Ok(())
    }

    /// One render loop iteration.
    pub fn tick(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.session.wait_for_message(self.wait_timeout)? {
            let mut handler = FrameHandler {
                frames: &mut self.frames,
                password: self.password.as_deref(),
            };
            self.session.handle_message(&mut handler)?;
        }
        self.present_if_dirty();
        Ok(())
    }

    /// Upload and show the pending frame, if any. Returns whether it did.
    pub fn present_if_dirty(&mut self) -> bool {
        if !self.flags.is_ready() {
            return false;
        }
        let format = self.frames.format();
        let Some(frame) = self.frames.take_frame() else {
            return false;
        };
        let result = self
            .presenter
            .upload(frame, format.width, format.height)
            .and_then(|_| self.presenter.present());
        if let Err(e) = result {
            log::error!("Present failed: {}", e);
        }
        true
    }

    /// Run until the session ends or the running flag clears, then stop
    /// and join the pumps.
    pub fn run(mut self) -> Shutdown {
        log::info!("Render loop running");
        let reason = loop {
            if !self.flags.is_running() {
                break Shutdown::Requested;
            }
            if let Err(e) = self.tick() {
                break Shutdown::Session(e);
            }
        };
        self.shutdown();
        reason
    }

    fn shutdown(&mut self) {
        self.flags.stop();
        for handle in self.pumps.drain(..) {
            let name = handle.thread().name().unwrap_or("pump").to_string();
            if handle.join().is_err() {
                log::error!("[{}] thread panicked", name);
            }
        }
        self.flags.set_ready(false);
        log::info!("Render loop stopped");
    }
}
