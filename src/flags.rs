//! Cooperative signals shared between the render loop and the pumps.
//! Only the render loop writes them; the pumps poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub struct SessionFlags {
    running: AtomicBool,
    ready: AtomicBool,
}

impl SessionFlags {
    /// Starts running, not ready.
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            ready: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedFlags = Arc<SessionFlags>;
