//! Double-buffered remote framebuffer owned by the render loop.

use crate::session::{PixelFormat, Rect};

pub struct Framebuffers {
    buffers: [Vec<u32>; 2],
    back: usize,
    format: PixelFormat,
    dirty: bool,
}

impl Framebuffers {
    pub fn new(width: u16, height: u16) -> Self {
        let len = usize::from(width) * usize::from(height);
        Self {
            buffers: [vec![0; len], vec![0; len]],
            back: 0,
            format: PixelFormat::rgb888(width, height),
            dirty: false,
        }
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Write target for the next protocol update.
    pub fn back_mut(&mut self) -> &mut [u32] {
        &mut self.buffers[self.back]
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the dirty flag and flip the buffers if a new frame is waiting.
    /// Returns the finished frame. The new back buffer starts as a copy of
    /// it because updates only cover damaged rectangles.
    pub fn take_frame(&mut self) -> Option<&[u32]> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;

        let finished = self.back;
        self.back = 1 - finished;
        let (a, b) = self.buffers.split_at_mut(1);
        let (src, dst) = if finished == 0 { (&a[0], &mut b[0]) } else { (&b[0], &mut a[0]) };
        dst.copy_from_slice(src);

        Some(&self.buffers[finished])
    }

    /// Reported damage that falls outside the surface is a server bug; keep
    /// the frame but say so.
    pub fn check_rect(&self, rect: Rect) -> bool {
        u32::from(rect.x) + u32::from(rect.width) <= u32::from(self.format.width)
            && u32::from(rect.y) + u32::from(rect.height) <= u32::from(self.format.height)
    }
}
