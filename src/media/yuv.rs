// SPDX-License-Identifier: GPL-3.0-only

//! NV12 to RGBA conversion with a reusable output buffer
//!
//! The converter is owned by the capture worker and called once per frame.
//! Its output buffer is reallocated only when the frame dimensions change,
//! so steady-state capture performs zero heap allocations per frame.

use crate::errors::ConversionError;
use std::sync::Arc;
use tracing::debug;

/// Borrowed view over the planes of a single NV12 frame.
///
/// NV12 stores a full-resolution Y plane followed by a half-resolution
/// interleaved UV plane. Strides may exceed the visible width when the
/// producer pads rows.
#[derive(Debug, Clone, Copy)]
pub struct Nv12View<'a> {
    pub width: u32,
    pub height: u32,
    pub y_plane: &'a [u8],
    pub y_stride: usize,
    pub uv_plane: &'a [u8],
    pub uv_stride: usize,
}

/// Converts NV12 frames to packed RGBA8, reusing its output buffer across
/// frames of the same size.
#[derive(Debug, Default)]
pub struct RgbaConverter {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    reallocations: u64,
}

impl RgbaConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the output buffer has been (re)allocated.
    pub fn reallocations(&self) -> u64 {
        self.reallocations
    }

    /// Convert one NV12 frame into a shared RGBA buffer.
    ///
    /// The returned `Arc` is a copy of the internal buffer, so the caller may
    /// hold it for as long as it likes while the converter moves on to the
    /// next frame.
    pub fn convert(&mut self, src: &Nv12View<'_>) -> Result<Arc<[u8]>, ConversionError> {
        let width = src.width as usize;
        let height = src.height as usize;

        if width == 0 || height == 0 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "zero-sized frame {}x{}",
                src.width, src.height
            )));
        }
        if src.y_stride < width || src.uv_stride < width {
            return Err(ConversionError::UnsupportedFormat(format!(
                "stride smaller than width: y_stride={} uv_stride={} width={}",
                src.y_stride, src.uv_stride, width
            )));
        }

        // Last rows may be unpadded, so only require stride-sized rows up to
        // the final one.
        let y_needed = src.y_stride * (height - 1) + width;
        if src.y_plane.len() < y_needed {
            return Err(ConversionError::BufferTooSmall {
                expected: y_needed,
                actual: src.y_plane.len(),
            });
        }
        // UV samples come in interleaved pairs, so an odd visible width still
        // reads a full pair on the last row.
        let uv_rows = height.div_ceil(2);
        let uv_row_bytes = width.next_multiple_of(2);
        let uv_needed = src.uv_stride * (uv_rows - 1) + uv_row_bytes;
        if src.uv_plane.len() < uv_needed {
            return Err(ConversionError::BufferTooSmall {
                expected: uv_needed,
                actual: src.uv_plane.len(),
            });
        }

        self.ensure_capacity(src.width, src.height);

        // Process two rows at a time; each UV row is shared by a pair of Y rows.
        for y_idx in (0..height).step_by(2) {
            let uv_row = y_idx / 2;

            convert_row(
                src.y_plane,
                src.uv_plane,
                &mut self.buffer,
                y_idx,
                uv_row,
                width,
                src.y_stride,
                src.uv_stride,
            );

            if y_idx + 1 < height {
                convert_row(
                    src.y_plane,
                    src.uv_plane,
                    &mut self.buffer,
                    y_idx + 1,
                    uv_row,
                    width,
                    src.y_stride,
                    src.uv_stride,
                );
            }
        }

        Ok(Arc::from(self.buffer.as_slice()))
    }

    /// Reallocate the output buffer only if the frame dimensions changed.
    fn ensure_capacity(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        debug!(
            old_width = self.width,
            old_height = self.height,
            new_width = width,
            new_height = height,
            "Reallocating RGBA output buffer"
        );
        self.buffer = vec![0u8; width as usize * height as usize * 4];
        self.width = width;
        self.height = height;
        self.reallocations += 1;
    }
}

/// Convert one row of Y samples using the UV row shared by its pair.
///
/// Fixed-point BT.601 limited-range coefficients, scaled by 128:
///   r = y' + 1.402 v, g = y' - 0.344 u - 0.714 v, b = y' + 1.772 u
#[inline]
fn convert_row(
    y_plane: &[u8],
    uv_plane: &[u8],
    rgba: &mut [u8],
    y_idx: usize,
    uv_row: usize,
    width: usize,
    y_stride: usize,
    uv_stride: usize,
) {
    let y_row_start = y_idx * y_stride;
    let uv_row_start = uv_row * uv_stride;
    let out_row_start = y_idx * width * 4;

    for x_idx in (0..width).step_by(2) {
        let y_offset = y_row_start + x_idx;
        let uv_offset = uv_row_start + (x_idx / 2) * 2;

        // One UV sample covers two horizontal pixels.
        let u = uv_plane[uv_offset] as i32 - 128;
        let v = uv_plane[uv_offset + 1] as i32 - 128;

        let r_v = (179 * v) >> 7;
        let g_u = (44 * u) >> 7;
        let g_v = (91 * v) >> 7;
        let b_u = (227 * u) >> 7;

        let y1 = ((y_plane[y_offset] as i32 - 16) * 149) >> 7;
        let out = out_row_start + x_idx * 4;
        rgba[out] = (y1 + r_v).clamp(0, 255) as u8;
        rgba[out + 1] = (y1 - g_u - g_v).clamp(0, 255) as u8;
        rgba[out + 2] = (y1 + b_u).clamp(0, 255) as u8;
        rgba[out + 3] = 255;

        if x_idx + 1 < width {
            let y2 = ((y_plane[y_offset + 1] as i32 - 16) * 149) >> 7;
            let out2 = out_row_start + (x_idx + 1) * 4;
            rgba[out2] = (y2 + r_v).clamp(0, 255) as u8;
            rgba[out2 + 1] = (y2 - g_u - g_v).clamp(0, 255) as u8;
            rgba[out2 + 2] = (y2 + b_u).clamp(0, 255) as u8;
            rgba[out2 + 3] = 255;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frame(width: u32, height: u32) -> (Vec<u8>, Vec<u8>) {
        let y = vec![128u8; (width * height) as usize];
        let uv = vec![128u8; (width * height / 2) as usize];
        (y, uv)
    }

    #[test]
    fn converts_neutral_gray() {
        let (y, uv) = gray_frame(16, 16);
        let view = Nv12View {
            width: 16,
            height: 16,
            y_plane: &y,
            y_stride: 16,
            uv_plane: &uv,
            uv_stride: 16,
        };

        let mut converter = RgbaConverter::new();
        let rgba = converter.convert(&view).unwrap();

        assert_eq!(rgba.len(), 16 * 16 * 4);
        // y' = (128-16)*149 >> 7 = 130, neutral chroma adds nothing
        assert_eq!(rgba[0], 130);
        assert_eq!(rgba[1], 130);
        assert_eq!(rgba[2], 130);
        assert_eq!(rgba[3], 255);
    }

    #[test]
    fn buffer_reused_while_dimensions_stable() {
        let (y, uv) = gray_frame(32, 24);
        let view = Nv12View {
            width: 32,
            height: 24,
            y_plane: &y,
            y_stride: 32,
            uv_plane: &uv,
            uv_stride: 32,
        };

        let mut converter = RgbaConverter::new();
        for _ in 0..5 {
            converter.convert(&view).unwrap();
        }
        assert_eq!(converter.reallocations(), 1);
    }

    #[test]
    fn buffer_reallocated_when_dimensions_change() {
        let mut converter = RgbaConverter::new();

        let (y, uv) = gray_frame(16, 16);
        let small = Nv12View {
            width: 16,
            height: 16,
            y_plane: &y,
            y_stride: 16,
            uv_plane: &uv,
            uv_stride: 16,
        };
        converter.convert(&small).unwrap();

        let (y2, uv2) = gray_frame(32, 32);
        let large = Nv12View {
            width: 32,
            height: 32,
            y_plane: &y2,
            y_stride: 32,
            uv_plane: &uv2,
            uv_stride: 32,
        };
        let rgba = converter.convert(&large).unwrap();

        assert_eq!(converter.reallocations(), 2);
        assert_eq!(rgba.len(), 32 * 32 * 4);
    }

    #[test]
    fn respects_row_padding() {
        // 4x2 frame with 8-byte strides; padding bytes are poisoned so any
        // read past the visible width would change the output.
        let width = 4u32;
        let height = 2u32;
        let stride = 8usize;

        let mut y = vec![0u8; stride * height as usize];
        for row in 0..height as usize {
            for col in 0..width as usize {
                y[row * stride + col] = 128;
            }
            for col in width as usize..stride {
                y[row * stride + col] = 255;
            }
        }
        let mut uv = vec![255u8; stride];
        for col in 0..width as usize {
            uv[col] = 128;
        }

        let view = Nv12View {
            width,
            height,
            y_plane: &y,
            y_stride: stride,
            uv_plane: &uv,
            uv_stride: stride,
        };

        let mut converter = RgbaConverter::new();
        let rgba = converter.convert(&view).unwrap();

        for pixel in rgba.chunks_exact(4) {
            assert_eq!(pixel, &[130, 130, 130, 255]);
        }
    }

    #[test]
    fn handles_odd_width() {
        // 3x2 frame: the last pixel of each row shares the second half of a
        // chroma pair, so the UV row must hold 4 bytes, not 3.
        let width = 3u32;
        let height = 2u32;
        let y = vec![128u8; 6];

        let short_uv = vec![128u8; 3];
        let short = Nv12View {
            width,
            height,
            y_plane: &y,
            y_stride: 3,
            uv_plane: &short_uv,
            uv_stride: 3,
        };

        let mut converter = RgbaConverter::new();
        let err = converter.convert(&short).unwrap_err();
        assert!(matches!(err, ConversionError::BufferTooSmall { .. }));

        let uv = vec![128u8; 4];
        let view = Nv12View {
            width,
            height,
            y_plane: &y,
            y_stride: 3,
            uv_plane: &uv,
            uv_stride: 3,
        };

        let rgba = converter.convert(&view).unwrap();
        assert_eq!(rgba.len(), 3 * 2 * 4);
        for pixel in rgba.chunks_exact(4) {
            assert_eq!(pixel, &[130, 130, 130, 255]);
        }
    }

    #[test]
    fn rejects_short_y_plane() {
        let y = vec![0u8; 10];
        let uv = vec![128u8; 128];
        let view = Nv12View {
            width: 16,
            height: 16,
            y_plane: &y,
            y_stride: 16,
            uv_plane: &uv,
            uv_stride: 16,
        };

        let mut converter = RgbaConverter::new();
        let err = converter.convert(&view).unwrap_err();
        assert!(matches!(err, ConversionError::BufferTooSmall { .. }));
    }

    #[test]
    fn saturated_red_clamps_channels() {
        // V at maximum pushes red past 255 and green below 0.
        let width = 2u32;
        let height = 2u32;
        let y = vec![235u8; 4];
        let uv = vec![128u8, 255u8];

        let view = Nv12View {
            width,
            height,
            y_plane: &y,
            y_stride: 2,
            uv_plane: &uv,
            uv_stride: 2,
        };

        let mut converter = RgbaConverter::new();
        let rgba = converter.convert(&view).unwrap();
        assert_eq!(rgba[0], 255);
        assert!(rgba[2] <= 255);
        assert_eq!(rgba[3], 255);
    }
}
