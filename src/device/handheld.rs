use super::DeviceProfile;
use crate::orientation::Orientation;

/// Keyboard handheld with a 540×960 portrait panel mounted sideways.
pub const HANDHELD: DeviceProfile = DeviceProfile {
    name: "keyboard handheld",

    key_device: "/dev/input/event1",
    touch_device: "/dev/input/event7",

    touch_axis_max: 1000,
    touch_slots: 10,
    touch_orientation: Orientation::LandscapeRight,
    release_debounce: true,

    surface_width: 960,
    surface_height: 540,

    panel_width: 540,
    panel_height: 960,
    rotation_degrees: 90.0,
};
