//! Touch panel to remote surface coordinate mapping.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Raw touch axis as reported by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// How the touch panel sits relative to the remote surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Panel axes match the surface axes.
    Portrait,
    /// Panel rotated 90°: raw X drives surface Y (inverted), raw Y drives surface X.
    #[default]
    LandscapeRight,
    /// Panel rotated 90° the other way.
    LandscapeLeft,
    /// Panel rotated 180°.
    Inverted,
}

impl Orientation {
    /// Map one raw axis report onto the surface axis it drives.
    ///
    /// `value` is clamped to `0..=range` and scaled to the surface dimension,
    /// truncating toward zero.
    pub fn map_touch_axis(
        &self,
        axis: Axis,
        value: i32,
        range: i32,
        width: u16,
        height: u16,
    ) -> (Axis, i32) {
        let (target, invert) = match (self, axis) {
            (Orientation::Portrait, Axis::X) => (Axis::X, false),
            (Orientation::Portrait, Axis::Y) => (Axis::Y, false),
            (Orientation::LandscapeRight, Axis::X) => (Axis::Y, true),
            (Orientation::LandscapeRight, Axis::Y) => (Axis::X, false),
            (Orientation::LandscapeLeft, Axis::X) => (Axis::Y, false),
            (Orientation::LandscapeLeft, Axis::Y) => (Axis::X, true),
            (Orientation::Inverted, Axis::X) => (Axis::X, true),
            (Orientation::Inverted, Axis::Y) => (Axis::Y, true),
        };
        let dim = f64::from(match target {
            Axis::X => width,
            Axis::Y => height,
        });
        let scaled = (value.clamp(0, range) as f64 / range.max(1) as f64) * dim;
        let out = if invert { dim - scaled } else { scaled };
        (target, out as i32)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::LandscapeRight => write!(f, "landscape-right"),
            Orientation::LandscapeLeft => write!(f, "landscape-left"),
            Orientation::Inverted => write!(f, "inverted"),
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape-right" | "landscaperight" | "landscape_right" => Ok(Orientation::LandscapeRight),
            "landscape-left" | "landscapeleft" | "landscape_left" => Ok(Orientation::LandscapeLeft),
            "inverted" => Ok(Orientation::Inverted),
            _ => Err(format!(
                "Invalid orientation '{}'. Valid values: portrait, landscape-right, landscape-left, inverted",
                s
            )),
        }
    }
}
