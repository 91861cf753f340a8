// SPDX-License-Identifier: GPL-3.0-only

//! Backend layer for camera access
//!
//! - [`camera`]: GStreamer capture pipeline and the XDG camera portal

pub mod camera;
