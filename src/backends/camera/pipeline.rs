// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire GStreamer pipeline for camera capture
//!
//! Builds `pipewiresrc ! videoconvert ! NV12 ! appsink` and runs the CPU
//! color conversion inside the appsink callback. The callback thread is the
//! only place frames are converted, so the converter's reusable buffer never
//! needs locking.

use super::types::{CameraFrame, FrameSender};
use crate::constants::{pipeline, timing};
use crate::errors::CameraError;
use crate::media::{Nv12View, RgbaConverter};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Camera capture pipeline
///
/// Frames are delivered through the `FrameSender` passed to [`Self::new`].
/// Dropping the pipeline stops capture and releases the camera.
pub struct CameraPipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
}

impl CameraPipeline {
    /// Create and start a capture pipeline for the default camera.
    pub fn new(frame_sender: FrameSender) -> Result<Self, CameraError> {
        gstreamer::init()?;

        // videoconvert normalizes whatever the camera produces to NV12, which
        // is what the CPU converter expects.
        let description = "pipewiresrc ! videoconvert ! video/x-raw,format=NV12 ! appsink name=sink";
        debug!(description, "Creating capture pipeline");

        let pipeline = gstreamer::parse::launch(description)?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| {
                CameraError::InitializationFailed("Parsed element is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| CameraError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| CameraError::InitializationFailed("Failed to cast appsink".to_string()))?;

        // Keep only the latest frame: one queued buffer, drop the old one
        // whenever a newer sample arrives before the callback catches up.
        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        // The converter lives in the callback closure; GStreamer invokes
        // new_sample from a single streaming thread.
        let mut converter = RgbaConverter::new();
        let mut last_log = Instant::now();

        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_start = Instant::now();
                    let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);

                    let sample = appsink.pull_sample().map_err(|e| {
                        error!(frame = frame_num, error = ?e, "Failed to pull sample");
                        gstreamer::FlowError::Eos
                    })?;

                    let buffer = sample.buffer().ok_or_else(|| {
                        error!(frame = frame_num, "No buffer in sample");
                        gstreamer::FlowError::Error
                    })?;

                    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
                        warn!(frame = frame_num, "Skipping corrupted buffer");
                        return Err(gstreamer::FlowError::Error);
                    }

                    let caps = sample.caps().ok_or_else(|| {
                        error!(frame = frame_num, "No caps in sample");
                        gstreamer::FlowError::Error
                    })?;

                    let video_info = VideoInfo::from_caps(caps).map_err(|e| {
                        error!(frame = frame_num, error = ?e, "Failed to parse video info");
                        gstreamer::FlowError::Error
                    })?;

                    let map = buffer.map_readable().map_err(|e| {
                        error!(frame = frame_num, error = ?e, "Failed to map buffer");
                        gstreamer::FlowError::Error
                    })?;

                    let y_stride = video_info.stride()[0] as usize;
                    let uv_stride = video_info.stride()[1] as usize;
                    let uv_offset = video_info.offset()[1];

                    let data = map.as_slice();
                    if data.len() < uv_offset {
                        error!(
                            frame = frame_num,
                            len = data.len(),
                            uv_offset,
                            "Buffer shorter than UV plane offset"
                        );
                        return Err(gstreamer::FlowError::Error);
                    }

                    let view = Nv12View {
                        width: video_info.width(),
                        height: video_info.height(),
                        y_plane: &data[..uv_offset],
                        y_stride,
                        uv_plane: &data[uv_offset..],
                        uv_stride,
                    };

                    let rgba = match converter.convert(&view) {
                        Ok(rgba) => rgba,
                        Err(e) => {
                            error!(frame = frame_num, error = %e, "Frame conversion failed");
                            return Err(gstreamer::FlowError::Error);
                        }
                    };

                    let frame = CameraFrame {
                        width: video_info.width(),
                        height: video_info.height(),
                        rgba,
                        captured_at: frame_start,
                    };

                    // Non-blocking send. A full channel means the UI already
                    // has newer frames pending, so this one is dropped.
                    let mut sender = frame_sender.clone();
                    if let Err(e) = sender.try_send(frame) {
                        debug!(frame = frame_num, error = ?e, "Frame dropped (channel full)");
                    }

                    if last_log.elapsed() >= timing::FRAME_LOG_INTERVAL {
                        last_log = Instant::now();
                        debug!(
                            frame = frame_num,
                            width = video_info.width(),
                            height = video_info.height(),
                            reallocations = converter.reallocations(),
                            convert_us = frame_start.elapsed().as_micros() as u64,
                            "Frame throughput"
                        );
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            CameraError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            pipeline::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");
        if state != gstreamer::State::Playing {
            warn!("Pipeline did not reach the Playing state");
        }

        info!("Camera pipeline started");

        Ok(Self { pipeline, appsink })
    }
}

impl Drop for CameraPipeline {
    fn drop(&mut self) {
        // Clear callbacks first so no sample arrives while tearing down
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        let _ = self.pipeline.set_state(gstreamer::State::Null);
        let _ = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            pipeline::STOP_TIMEOUT_SECS,
        ));
        info!("Camera pipeline stopped");
    }
}
