// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera backend

use std::sync::Arc;
use std::time::Instant;

/// A single converted camera frame, ready for GPU upload.
///
/// Pixel data is packed RGBA8 with rows tightly packed at `width * 4` bytes.
/// Frames are cheap to clone; the pixel data is shared behind an `Arc`.
#[derive(Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
    pub captured_at: Instant,
}

impl std::fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgba_len", &self.rgba.len())
            .field("captured_at", &self.captured_at)
            .finish()
    }
}

/// Channel sender used by the capture pipeline to hand frames to the UI.
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_clone_shares_pixel_data() {
        let frame = CameraFrame {
            width: 2,
            height: 2,
            rgba: Arc::from(vec![0u8; 16].as_slice()),
            captured_at: Instant::now(),
        };
        let clone = frame.clone();
        assert!(Arc::ptr_eq(&frame.rgba, &clone.rgba));
    }
}
