#[cfg(test)]
use std::collections::VecDeque;
use std::io;

use evdevil::event::InputEvent;
use evdevil::Evdev;

/// A stream of raw input events.
pub trait EventSource {
    /// Next event if one is pending. Must not block for non-blocking sources.
    fn read_event(&mut self) -> io::Result<Option<InputEvent>>;
}

/// A local evdev node.
pub struct DeviceSource {
    evdev: Evdev,
    path: String,
    grabbed: bool,
}

impl DeviceSource {
    /// Open for polling: non-blocking, optionally grabbed so nothing else on
    /// the device sees the events.
    pub fn open(path: &str, grab: bool) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let evdev = Evdev::open(path).map_err(|e| format!("Failed to open {}: {}", path, e))?;
        evdev
            .set_nonblocking(true)
            .map_err(|e| format!("Failed to make {} non-blocking: {}", path, e))?;
        if grab {
            evdev.grab().map_err(|e| format!("Failed to grab {}: {}", path, e))?;
        }
        if let Ok(name) = evdev.name() {
            log::debug!("Opened {} ({})", path, name);
        }
        Ok(Self {
            evdev,
            path: path.into(),
            grabbed: grab,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl EventSource for DeviceSource {
    fn read_event(&mut self) -> io::Result<Option<InputEvent>> {
        let mut buf = [InputEvent::zeroed()];
        let result = self.evdev.read_events(&mut buf);
        read_outcome(result, buf[0])
    }
}

/// Turn the result of a one-event read into the polling contract: nothing
/// pending is `Ok(None)`, a closed device is an error.
fn read_outcome(result: io::Result<usize>, event: InputEvent) -> io::Result<Option<InputEvent>> {
    match result {
        Ok(0) => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input device closed")),
        Ok(_) => Ok(Some(event)),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e),
    }
}

impl Drop for DeviceSource {
    fn drop(&mut self) {
        if self.grabbed {
            if let Err(e) = self.evdev.ungrab() {
                log::debug!("Ungrab {}: {}", self.path, e);
            }
        }
        log::debug!("Closed {}", self.path);
    }
}

/// Pre-recorded events, handed out one per read.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedSource {
    events: VecDeque<InputEvent>,
}

#[cfg(test)]
impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl EventSource for ScriptedSource {
    fn read_event(&mut self) -> io::Result<Option<InputEvent>> {
        Ok(self.events.pop_front())
    }
}
