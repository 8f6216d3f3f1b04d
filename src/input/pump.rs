use std::thread;
use std::time::Duration;

use evdevil::event::{EventKind, InputEvent, KeyState};

use crate::flags::SharedFlags;
use crate::session::{EventSink, RemoteEvent};

use super::keys::{KeyAction, KeyTranslator};
use super::source::{DeviceSource, EventSource};
use super::touch::{TouchMapping, TouchTracker};

/// Sleep between polls when the sources are idle.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Where the pump reads from and how touches are mapped.
#[derive(Debug, Clone)]
pub struct InputSettings {
    pub key_device: String,
    pub touch_device: String,
    pub grab: bool,
    pub touch_slots: usize,
    pub mapping: TouchMapping,
    pub release_debounce: bool,
}

/// Reads the keyboard and touch panel and forwards translated events.
pub struct InputPump<K, T> {
    keys: K,
    touch: T,
    translator: KeyTranslator,
    tracker: TouchTracker,
    sink: Box<dyn EventSink>,
    key_events: u64,
    touch_events: u64,
}

impl<K: EventSource, T: EventSource> InputPump<K, T> {
    pub fn new(keys: K, touch: T, tracker: TouchTracker, sink: Box<dyn EventSink>) -> Self {
        Self {
            keys,
            touch,
            translator: KeyTranslator::new(),
            tracker,
            sink,
            key_events: 0,
            touch_events: 0,
        }
    }

    /// One non-blocking read from each source. Returns whether either
    /// produced an event.
    pub fn poll_once(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut busy = false;

        if let Some(ev) = self.keys.read_event()? {
            busy = true;
            self.handle_key_event(&ev)?;
        }

        if let Some(ev) = self.touch.read_event()? {
            busy = true;
            self.handle_touch_event(&ev)?;
        }

        Ok(busy)
    }

    /// Poll until the running flag clears.
    pub fn run(mut self, flags: &SharedFlags) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        log::info!("Input forwarding started");
        while flags.is_running() {
            self.poll_once()?;
            thread::sleep(POLL_INTERVAL);
        }
        log::info!(
            "Input forwarding stopped ({} key events, {} touch events)",
            self.key_events,
            self.touch_events
        );
        Ok(())
    }

    fn handle_key_event(&mut self, ev: &InputEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let EventKind::Key(key) = ev.kind() else {
            return Ok(());
        };
        let pressed = key.state() != KeyState::RELEASED;
        log::trace!("[keys] {:?} {:?}", key.key(), key.state());

        log_progress("Key", &mut self.key_events);

        match self.translator.translate(key.key(), pressed) {
            KeyAction::Key(keysym) => self.sink.send(RemoteEvent::Key { keysym, down: pressed }),
            KeyAction::Pointer(mask) => self.sink.send(self.tracker.pointer_event(mask)),
            KeyAction::None => Ok(()),
        }
    }

    fn handle_touch_event(&mut self, ev: &InputEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !matches!(ev.kind(), EventKind::Abs(_) | EventKind::Syn(_)) {
            return Ok(());
        }
        log_progress("Touch", &mut self.touch_events);

        let alt = self.translator.modifiers().is_alt();
        match self.tracker.handle(ev, alt) {
            Some(event) => self.sink.send(event),
            None => Ok(()),
        }
    }
}

fn log_progress(kind: &str, count: &mut u64) {
    if *count == 0 {
        log::info!("{} events flowing", kind);
    }
    *count += 1;
    if (*count).is_multiple_of(500) {
        log::debug!("{} events: {}", kind, count);
    }
}

/// Open the keyboard and the touch panel. If either fails, local input is
/// disabled; a source that did open is dropped again, releasing its grab.
fn open_sources<S>(
    settings: &InputSettings,
    open: impl Fn(&str, bool) -> Result<S, Box<dyn std::error::Error + Send + Sync>>,
) -> Option<(S, S)> {
    let keys = match open(&settings.key_device, settings.grab) {
        Ok(source) => source,
        Err(e) => {
            log::error!("[input] {}; continuing without local input", e);
            return None;
        }
    };
    let touch = match open(&settings.touch_device, settings.grab) {
        Ok(source) => source,
        Err(e) => {
            log::error!("[input] {}; continuing without local input", e);
            return None;
        }
    };
    Some((keys, touch))
}

/// Thread body: open both devices and pump until shutdown. A device that
/// cannot be opened disables local input but leaves the session running.
pub fn run_input(settings: InputSettings, sink: Box<dyn EventSink>, flags: SharedFlags) {
    let Some((keys, touch)) = open_sources(&settings, DeviceSource::open) else {
        return;
    };
    log::info!(
        "[input] keys={} touch={} grab={}",
        keys.path(),
        touch.path(),
        settings.grab
    );

    let tracker = TouchTracker::new(settings.touch_slots, settings.mapping, settings.release_debounce);
    let pump = InputPump::new(keys, touch, tracker, sink);
    if let Err(e) = pump.run(&flags) {
        log::error!("[input] {}", e);
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::Instant;

    use evdevil::event::{Abs, AbsEvent, EventType, Key, KeyEvent, Syn};

    use super::*;
    use crate::device::HANDHELD;
    use crate::flags::SessionFlags;
    use crate::input::keysym::XK_SHIFT_L;
    use crate::input::source::ScriptedSource;

    fn tracker() -> TouchTracker {
        TouchTracker::new(10, TouchMapping::from_profile(&HANDHELD), true)
    }

    fn key(code: Key, value: i32) -> InputEvent {
        KeyEvent::new(code, KeyState::from_raw(value)).into()
    }

    fn tap(x: i32, y: i32) -> Vec<InputEvent> {
        vec![
            AbsEvent::new(Abs::MT_TRACKING_ID, 0).into(),
            AbsEvent::new(Abs::MT_POSITION_X, x).into(),
            AbsEvent::new(Abs::MT_POSITION_Y, y).into(),
            Syn::MT_REPORT.into(),
            Syn::REPORT.into(),
            Syn::REPORT.into(),
        ]
    }

    fn drain(pump: &mut InputPump<ScriptedSource, ScriptedSource>) {
        while pump.poll_once().unwrap() {}
    }

    #[test]
    fn test_alt_k_presses_at_last_touch_without_key_event() {
        let (tx, rx) = mpsc::channel();
        let keys = ScriptedSource::new([
            key(Key::KEY_RIGHTALT, 1),
            key(Key::KEY_K, 1),
            key(Key::KEY_K, 0),
            key(Key::KEY_RIGHTALT, 0),
        ]);
        let mut touch_events = tap(500, 500);
        touch_events.truncate(4);
        // Touch first so slot 0 holds a position before the chord.
        let mut pump = InputPump::new(ScriptedSource::default(), ScriptedSource::new(touch_events), tracker(), Box::new(tx));
        drain(&mut pump);
        pump.keys = keys;
        drain(&mut pump);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                RemoteEvent::Pointer { x: 480, y: 270, button_mask: 1 },
                RemoteEvent::Pointer { x: 480, y: 270, button_mask: 1 },
                RemoteEvent::Pointer { x: 480, y: 270, button_mask: 0 },
            ]
        );
        assert!(!pump.translator.modifiers().is_alt());
        assert!(!pump.translator.modifiers().is_shift());
    }

    #[test]
    fn test_ignores_non_key_events_from_keyboard() {
        let (tx, rx) = mpsc::channel();
        let keys = ScriptedSource::new([
            Syn::REPORT.into(),
            InputEvent::new(EventType::MSC, 4, 30), // MSC_SCAN
            key(Key::KEY_A, 1),
        ]);
        let mut pump = InputPump::new(keys, ScriptedSource::default(), tracker(), Box::new(tx));
        drain(&mut pump);
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![RemoteEvent::Key { keysym: 0x61, down: true }]);
    }

    #[test]
    fn test_autorepeat_is_sent_as_press() {
        let (tx, rx) = mpsc::channel();
        let keys = ScriptedSource::new([key(Key::KEY_A, 1), key(Key::KEY_A, 2), key(Key::KEY_A, 0)]);
        let mut pump = InputPump::new(keys, ScriptedSource::default(), tracker(), Box::new(tx));
        drain(&mut pump);
        let downs: Vec<bool> = rx
            .try_iter()
            .map(|e| match e {
                RemoteEvent::Key { down, .. } => down,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(downs, vec![true, true, false]);
    }

    #[test]
    fn test_shift_modifier_is_forwarded_and_applied() {
        let (tx, rx) = mpsc::channel();
        let keys = ScriptedSource::new([
            key(Key::KEY_CAPSLOCK, 1),
            key(Key::KEY_1, 1),
            key(Key::KEY_CAPSLOCK, 0),
            key(Key::KEY_1, 1),
        ]);
        let mut pump = InputPump::new(keys, ScriptedSource::default(), tracker(), Box::new(tx));
        drain(&mut pump);
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                RemoteEvent::Key { keysym: XK_SHIFT_L, down: true },
                RemoteEvent::Key { keysym: 0x21, down: true },
                RemoteEvent::Key { keysym: XK_SHIFT_L, down: false },
                RemoteEvent::Key { keysym: 0xffb1, down: true },
            ]
        );
    }

    #[test]
    fn test_closed_sink_stops_pump() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let keys = ScriptedSource::new([key(Key::KEY_A, 1)]);
        let mut pump = InputPump::new(keys, ScriptedSource::default(), tracker(), Box::new(tx));
        assert!(pump.poll_once().is_err());
    }

    #[test]
    fn test_session_with_tap_and_key_press_in_arrival_order() {
        let (tx, rx) = mpsc::channel();
        let flags: SharedFlags = Arc::new(SessionFlags::new());
        let keys = ScriptedSource::new([key(Key::KEY_A, 1), key(Key::KEY_A, 0)]);
        let touch = ScriptedSource::new(tap(500, 500));
        let pump = InputPump::new(keys, touch, tracker(), Box::new(tx));

        let pump_flags = flags.clone();
        let handle = thread::spawn(move || pump.run(&pump_flags));

        let mut events = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(3);
        while events.len() < 4 && Instant::now() < deadline {
            if let Ok(ev) = rx.recv_timeout(Duration::from_millis(50)) {
                events.push(ev);
            }
        }
        flags.stop();
        handle.join().unwrap().unwrap();
        events.extend(rx.try_iter());

        assert_eq!(
            events,
            vec![
                RemoteEvent::Key { keysym: 0x61, down: true },
                RemoteEvent::Key { keysym: 0x61, down: false },
                RemoteEvent::Pointer { x: 480, y: 270, button_mask: 1 },
                RemoteEvent::Pointer { x: 480, y: 270, button_mask: 0 },
            ]
        );
    }

    struct Unplugged;

    impl EventSource for Unplugged {
        fn read_event(&mut self) -> io::Result<Option<InputEvent>> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input device closed"))
        }
    }

    #[test]
    fn test_unplugged_device_ends_pump() {
        let (tx, _rx) = mpsc::channel();
        let flags: SharedFlags = Arc::new(SessionFlags::new());
        let pump = InputPump::new(ScriptedSource::default(), Unplugged, tracker(), Box::new(tx));
        let err = pump.run(&flags).unwrap_err();
        assert!(err.to_string().contains("closed"));
        assert!(flags.is_running());
    }

    struct FakeDevice {
        closed: Arc<AtomicBool>,
    }

    impl Drop for FakeDevice {
        fn drop(&mut self) {
            self.closed.store(true, Ordering::Relaxed);
        }
    }

    fn input_settings() -> InputSettings {
        InputSettings {
            key_device: "/dev/input/event1".into(),
            touch_device: "/dev/input/event7".into(),
            grab: true,
            touch_slots: 10,
            mapping: TouchMapping::from_profile(&HANDHELD),
            release_debounce: true,
        }
    }

    #[test]
    fn test_missing_touch_device_releases_keyboard() {
        let closed = Arc::new(AtomicBool::new(false));
        let opened = open_sources(&input_settings(), |path, grab| {
            assert!(grab);
            if path == "/dev/input/event1" {
                Ok(FakeDevice { closed: closed.clone() })
            } else {
                Err(format!("Failed to open {}: No such file or directory", path).into())
            }
        });
        assert!(opened.is_none());
        assert!(closed.load(Ordering::Relaxed));
    }

    #[test]
    fn test_both_devices_open() {
        let closed = Arc::new(AtomicBool::new(false));
        let opened = open_sources(&input_settings(), |_, _| Ok(FakeDevice { closed: closed.clone() }));
        assert!(opened.is_some());
        assert!(!closed.load(Ordering::Relaxed));
    }

    #[test]
    fn test_run_input_returns_when_devices_are_missing() {
        let (tx, _rx) = mpsc::channel();
        let flags: SharedFlags = Arc::new(SessionFlags::new());
        let settings = InputSettings {
            key_device: "/nonexistent/keys".into(),
            touch_device: "/nonexistent/touch".into(),
            grab: false,
            ..input_settings()
        };
        run_input(settings, Box::new(tx), flags.clone());
        assert!(flags.is_running());
    }
}
