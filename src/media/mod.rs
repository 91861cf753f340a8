// SPDX-License-Identifier: GPL-3.0-only

//! CPU-side media processing

pub mod yuv;

pub use yuv::{Nv12View, RgbaConverter};
