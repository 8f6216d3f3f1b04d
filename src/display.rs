//! Compositor and GPU collaborators, and the display pump thread.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use crate::flags::SharedFlags;

/// Sleep while the display is not ready yet.
const IDLE_INTERVAL: Duration = Duration::from_millis(1);

/// Compositor connection half that can live on the display pump thread.
pub trait Display: Send {
    /// Dispatch pending compositor events. May block until some arrive.
    fn dispatch(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Texture sampling used when scaling the remote surface onto the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    /// Nearest neighbour.
    #[default]
    Pixel,
    /// Linear.
    Blur,
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Pixel => write!(f, "pixel"),
            Filter::Blur => write!(f, "blur"),
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pixel" | "nearest" => Ok(Filter::Pixel),
            "blur" | "linear" => Ok(Filter::Blur),
            _ => Err(format!("Invalid filter '{}'. Valid values: pixel, blur", s)),
        }
    }
}

/// Parameters for the rotate-and-scale shader pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub angle_degrees: f32,
    pub aspect: f32,
    pub filter: Filter,
    pub panel_width: u16,
    pub panel_height: u16,
}

impl RenderParams {
    pub fn angle_radians(&self) -> f32 {
        self.angle_degrees.to_radians()
    }
}

/// GPU side: upload the remote frame and show it.
pub trait Presenter {
    /// Compile shaders and set up the texture.
    fn prepare(&mut self, params: &RenderParams) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn upload(&mut self, pixels: &[u32], width: u16, height: u16) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn present(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Thread body: dispatch compositor events once the render loop marks the
/// display ready, until shutdown.
pub fn run_display(mut display: Box<dyn Display>, flags: SharedFlags) {
    log::info!("Display dispatch started");
    let mut dispatched: u64 = 0;
    while flags.is_running() {
        if !flags.is_ready() {
            thread::sleep(IDLE_INTERVAL);
            continue;
        }
        if let Err(e) = display.dispatch() {
            log::error!("[display] {}", e);
            break;
        }
        dispatched += 1;
        if dispatched.is_multiple_of(500) {
            log::debug!("Display dispatches: {}", dispatched);
        }
    }
    log::info!("Display dispatch stopped");
}

/// Display for running without a compositor.
pub struct HeadlessDisplay;

impl Display for HeadlessDisplay {
    fn dispatch(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        thread::sleep(Duration::from_millis(10));
        Ok(())
    }
}

/// Presenter that only counts frames.
#[derive(Default)]
pub struct HeadlessPresenter {
    frames: u64,
}

impl Presenter for HeadlessPresenter {
    fn prepare(&mut self, params: &RenderParams) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        log::info!(
            "Headless presenter: {}x{} panel, {:.4} rad rotation, aspect {}, {} filter",
            params.panel_width,
            params.panel_height,
            params.angle_radians(),
            params.aspect,
            params.filter
        );
        Ok(())
    }

    fn upload(&mut self, pixels: &[u32], width: u16, height: u16) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if pixels.len() != usize::from(width) * usize::from(height) {
            return Err(format!("frame is {} pixels, expected {}x{}", pixels.len(), width, height).into());
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.frames += 1;
        if self.frames.is_multiple_of(500) {
            log::debug!("Frames presented: {}", self.frames);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::flags::SessionFlags;

    struct CountingDisplay(Arc<AtomicUsize>);

    impl Display for CountingDisplay {
        fn dispatch(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.0.fetch_add(1, Ordering::Relaxed);
            thread::sleep(Duration::from_millis(1));
            Ok(())
        }
    }

    #[test]
    fn test_waits_for_ready_then_dispatches() {
        let flags: SharedFlags = Arc::new(SessionFlags::new());
        let count = Arc::new(AtomicUsize::new(0));
        let display = Box::new(CountingDisplay(count.clone()));
        let pump_flags = flags.clone();
        let handle = thread::spawn(move || run_display(display, pump_flags));

        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::Relaxed), 0);

        flags.set_ready(true);
        thread::sleep(Duration::from_millis(30));
        flags.stop();
        handle.join().unwrap();
        assert!(count.load(Ordering::Relaxed) > 0);
    }

    #[test]
    fn test_dispatch_error_ends_pump() {
        struct Broken;
        impl Display for Broken {
            fn dispatch(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
                Err("compositor went away".into())
            }
        }
        let flags: SharedFlags = Arc::new(SessionFlags::new());
        flags.set_ready(true);
        // Returns on its own without the running flag being cleared.
        run_display(Box::new(Broken), flags.clone());
        assert!(flags.is_running());
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("pixel".parse::<Filter>().unwrap(), Filter::Pixel);
        assert_eq!("Blur".parse::<Filter>().unwrap(), Filter::Blur);
        assert!("smooth".parse::<Filter>().is_err());
    }

    #[test]
    fn test_angle_radians() {
        let params = RenderParams {
            angle_degrees: 90.0,
            aspect: 1.0,
            filter: Filter::Pixel,
            panel_width: 540,
            panel_height: 960,
        };
        assert!((params.angle_radians() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
