// SPDX-License-Identifier: GPL-3.0-only

//! FilterCam - a live camera filter demo for the COSMIC desktop
//!
//! A single-screen application that streams the default camera, converts each
//! frame from planar YUV to packed RGBA, and renders it through a GPU preview
//! widget with a user-selected filter.
//!
//! # Architecture
//!
//! - [`app`]: Application model, messages, and UI
//! - [`backends`]: Camera capture pipeline and portal permission request
//! - [`media`]: CPU color conversion with a reusable output buffer
//! - [`config`]: User configuration handling

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod media;

// Re-export commonly used types
pub use app::{AppModel, CameraAccess, FilterKind, Message};
pub use config::Config;
