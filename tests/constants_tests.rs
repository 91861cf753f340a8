// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use filtercam::app::FilterKind;
use filtercam::constants::{pipeline, ui};

#[test]
fn test_appsink_keeps_only_latest_frame() {
    // One queued buffer plus drop=true is what makes the sink discard stale
    // frames instead of queueing them.
    assert_eq!(pipeline::MAX_BUFFERS, 1);
}

#[test]
fn test_frame_channel_stays_small() {
    // A large channel would reintroduce the backlog the appsink avoids.
    assert!(pipeline::FRAME_CHANNEL_CAPACITY <= 4);
}

#[test]
fn test_filter_bar_rows_hold_all_filters() {
    let rows = FilterKind::ALL.len().div_ceil(ui::FILTERS_PER_ROW);
    assert!(rows * ui::FILTERS_PER_ROW >= FilterKind::ALL.len());
    assert!(rows <= 4, "Filter bar should not dominate the screen");
}
