// SPDX-License-Identifier: GPL-3.0-only

//! Camera capture backend
//!
//! Frames flow from a PipeWire GStreamer pipeline through the CPU color
//! converter into a bounded channel read by the UI subscription. The appsink
//! is configured to keep only the latest frame, so a slow consumer sees
//! fresh frames rather than a growing backlog.

pub mod pipeline;
pub mod portal;
pub mod types;

pub use pipeline::CameraPipeline;
pub use types::{CameraFrame, FrameSender};
