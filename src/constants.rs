// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Camera pipeline constants
pub mod pipeline {
    /// Maximum buffers queued in the appsink before old frames are dropped.
    /// Together with `drop=true` this keeps only the latest frame when the
    /// UI falls behind the camera.
    pub const MAX_BUFFERS: u32 = 1;

    /// Timeout for the pipeline to reach the Playing state
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Timeout for the pipeline to reach the Null state on shutdown
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Delay before retrying after a pipeline failure
    pub const RETRY_DELAY_SECS: u64 = 5;

    /// Capacity of the frame channel between the capture thread and the UI.
    /// Small on purpose; a full channel means the UI already has a newer
    /// frame pending and the current one can be dropped.
    pub const FRAME_CHANNEL_CAPACITY: usize = 2;
}

/// Timing constants
pub mod timing {
    use std::time::Duration;

    /// How often to log frame throughput at debug level
    pub const FRAME_LOG_INTERVAL: Duration = Duration::from_secs(10);

    /// Poll timeout while waiting for frames, so subscription shutdown is
    /// noticed even when the camera stalls
    pub const FRAME_POLL_TIMEOUT: Duration = Duration::from_millis(16);
}

/// UI layout constants
pub mod ui {
    /// Spacing between filter buttons
    pub const FILTER_BAR_SPACING: u16 = 8;

    /// Number of filter buttons per row
    pub const FILTERS_PER_ROW: usize = 4;

    /// Corner radius of the camera preview surface
    pub const PREVIEW_CORNER_RADIUS: f32 = 12.0;

    /// Padding around the main content column
    pub const CONTENT_PADDING: u16 = 12;
}
