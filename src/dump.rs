//! Dump raw input events for debugging.
//! Run: vnc-pad dump keys  (or dump touch) to stream and print events.

use evdevil::event::{Abs, EventType, InputEvent, Key, Syn};
use evdevil::Evdev;

use crate::config::Config;

/// Resolve "keys" / "touch" to the configured device path.
pub fn device_path<'a>(which: &str, config: &'a Config) -> Option<&'a str> {
    match which {
        "keys" => Some(&config.key_device),
        "touch" => Some(&config.touch_device),
        _ => None,
    }
}

/// Symbolic name of an event's code, e.g. `ABS_MT_TRACKING_ID`.
pub fn code_name(ev: &InputEvent) -> String {
    let code = ev.raw_code();
    match ev.event_type() {
        EventType::SYN => format!("{:?}", Syn::from_raw(code)),
        EventType::KEY => format!("{:?}", Key::from_raw(code)),
        EventType::ABS => format!("{:?}", Abs::from_raw(code)),
        ty => format!("{:?} code{}", ty, code),
    }
}

pub fn run_dump(path: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let evdev = Evdev::open(path).map_err(|e| format!("Failed to open {}: {}", path, e))?;
    let name = evdev.name().unwrap_or_default();
    eprintln!("Dumping events from {} ({}) (Ctrl+C to stop):\n", path, name);
    for (n, ev) in evdev.raw_events().enumerate() {
        let ev = ev?;
        println!("{:6}  {}  value={}", n + 1, code_name(&ev), ev.raw_value());
    }
    Ok(())
}
