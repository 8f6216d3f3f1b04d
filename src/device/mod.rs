mod handheld;

pub use handheld::HANDHELD;

use crate::orientation::Orientation;

/// Device-specific parameters for input handling and display.
#[derive(Debug, Clone, Copy)]
pub struct DeviceProfile {
    pub name: &'static str,

    // Default device paths
    pub key_device: &'static str,
    pub touch_device: &'static str,

    // Touch controller: normalized axis range and tracking-id slots
    pub touch_axis_max: i32,
    pub touch_slots: usize,

    /// Fixed sensor-to-display calibration.
    pub touch_orientation: Orientation,

    /// Release the pointer after two sync markers without a lift. Some
    /// firmware modes never report the lift axis.
    pub release_debounce: bool,

    // Remote surface requested from the session
    pub surface_width: u16,
    pub surface_height: u16,

    // Physical panel, portrait
    pub panel_width: u16,
    pub panel_height: u16,

    /// Rotation applied by the presenter to fit the surface on the panel.
    pub rotation_degrees: f32,
}

impl DeviceProfile {
    /// Get profile for the current device.
    pub fn current() -> &'static Self {
        &HANDHELD
    }
}
