//! Touch contact tracking for the handheld's touch controller.
//!
//! The controller reports each finger as a run of ABS_MT_* axis events closed
//! by SYN_MT_REPORT (value 0), followed by SYN_REPORT. A contact end turns
//! into a primary-button pointer event at slot 0; when two sync markers pass
//! without another contact the button is released again.

use evdevil::event::{Abs, EventKind, InputEvent, Syn};

use crate::device::DeviceProfile;
use crate::orientation::{Axis, Orientation};
use crate::session::RemoteEvent;

use super::keys::BUTTON_PRIMARY;

/// Sync markers without a lift before the button is released.
const RELEASE_AFTER_SYNCS: u32 = 2;

/// Last known state of one finger slot, in surface pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: i32,
    pub y: i32,
    pub pressure: i32,
}

/// Fixed mapping from panel axes to the remote surface.
#[derive(Debug, Clone, Copy)]
pub struct TouchMapping {
    pub orientation: Orientation,
    pub axis_max: i32,
    pub surface_width: u16,
    pub surface_height: u16,
}

impl TouchMapping {
    pub fn from_profile(device: &DeviceProfile) -> Self {
        Self {
            orientation: device.touch_orientation,
            axis_max: device.touch_axis_max,
            surface_width: device.surface_width,
            surface_height: device.surface_height,
        }
    }
}

pub struct TouchTracker {
    // Slots are never cleared on lift; the next contact overwrites them.
    points: Vec<TouchPoint>,
    slot: Option<usize>,
    valid: bool,
    syncs_since_lift: u32,
    mapping: TouchMapping,
    release_debounce: bool,
}

impl TouchTracker {
    pub fn new(slots: usize, mapping: TouchMapping, release_debounce: bool) -> Self {
        Self {
            points: vec![TouchPoint::default(); slots.max(1)],
            slot: Some(0),
            valid: false,
            syncs_since_lift: 0,
            mapping,
            release_debounce,
        }
    }

    /// Slot 0, the only one that drives the remote pointer.
    pub fn primary(&self) -> TouchPoint {
        self.points[0]
    }

    pub fn point(&self, slot: usize) -> Option<TouchPoint> {
        self.points.get(slot).copied()
    }

    /// Feed one raw event. `alt` is the current alt-equivalent key state.
    pub fn handle(&mut self, ev: &InputEvent, alt: bool) -> Option<RemoteEvent> {
        match ev.kind() {
            EventKind::Abs(abs) => {
                self.handle_axis(abs.abs(), abs.value());
                None
            }
            EventKind::Syn(syn) => self.handle_sync(syn.syn(), syn.raw_value(), alt),
            _ => None,
        }
    }

    fn handle_axis(&mut self, abs: Abs, value: i32) {
        match abs {
            Abs::MT_TRACKING_ID => {
                self.valid = true;
                self.slot = usize::try_from(value).ok().filter(|&s| s < self.points.len());
                if self.slot.is_none() {
                    log::debug!("[touch] tracking id {} outside slot range", value);
                }
            }
            Abs::MT_POSITION_X => {
                self.valid = true;
                self.set_position(Axis::X, value);
            }
            Abs::MT_POSITION_Y => {
                self.valid = true;
                self.set_position(Axis::Y, value);
            }
            Abs::MT_PRESSURE => {
                self.valid = true;
                if let Some(slot) = self.slot {
                    self.points[slot].pressure = value;
                }
            }
            _ => {}
        }
    }

    fn set_position(&mut self, axis: Axis, value: i32) {
        let Some(slot) = self.slot else { return };
        let m = &self.mapping;
        let (target, pos) =
            m.orientation
                .map_touch_axis(axis, value, m.axis_max, m.surface_width, m.surface_height);
        match target {
            Axis::X => self.points[slot].x = pos,
            Axis::Y => self.points[slot].y = pos,
        }
    }

    fn handle_sync(&mut self, syn: Syn, value: i32, alt: bool) -> Option<RemoteEvent> {
        if syn == Syn::MT_REPORT && value == 0 {
            if !self.valid {
                return None;
            }
            self.valid = false;
            self.syncs_since_lift = 0;
            log::trace!(
                "[touch] contact end, slot {:?} = {:?}",
                self.slot,
                self.slot.and_then(|s| self.point(s))
            );
            // With alt held a touch only moves the pointer.
            let mask = if alt { 0 } else { BUTTON_PRIMARY };
            return Some(self.pointer_event(mask));
        }

        self.syncs_since_lift = self.syncs_since_lift.saturating_add(1);
        if self.release_debounce && !alt && self.syncs_since_lift == RELEASE_AFTER_SYNCS {
            return Some(self.pointer_event(0));
        }
        None
    }

    /// Pointer event at slot 0.
    pub fn pointer_event(&self, button_mask: u8) -> RemoteEvent {
        let p = self.primary();
        RemoteEvent::Pointer {
            x: p.x.clamp(0, u16::MAX as i32) as u16,
            y: p.y.clamp(0, u16::MAX as i32) as u16,
            button_mask,
        }
    }
}
