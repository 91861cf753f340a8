// SPDX-License-Identifier: GPL-3.0-only

//! Application state types

use crate::backends::camera::CameraFrame;
use crate::config::Config;
use cosmic::cosmic_config;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Whether the user has granted camera access through the portal.
///
/// No capture pipeline is created and no frame is processed until the state
/// reaches [`CameraAccess::Granted`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CameraAccess {
    /// Portal request is still pending
    #[default]
    Unknown,
    /// Access granted, capture may run
    Granted,
    /// Access refused or the portal is unavailable
    Denied,
}

impl CameraAccess {
    pub fn allows_capture(self) -> bool {
        matches!(self, CameraAccess::Granted)
    }
}

/// Available preview filters.
///
/// The order here is the order of the buttons in the filter bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    /// No filter applied
    #[default]
    Original,
    /// Pencil sketch from luminance edges
    Sketch,
    /// Inverted colors
    Invert,
    /// Partially inverted tones above a luminance threshold
    Solarize,
    /// Luminance-weighted grayscale
    Grayscale,
    /// Brightened image
    Brightness,
    /// Increased contrast around mid-gray
    Contrast,
    /// Blocky pixelation
    Pixelate,
    /// Spherical refraction through a glass ball
    GlassSphere,
    /// Ink crosshatch strokes by luminance
    Crosshatch,
    /// Gamma curve adjustment
    Gamma,
}

impl FilterKind {
    /// All filters in filter bar order.
    pub const ALL: [FilterKind; 11] = [
        FilterKind::Original,
        FilterKind::Sketch,
        FilterKind::Invert,
        FilterKind::Solarize,
        FilterKind::Grayscale,
        FilterKind::Brightness,
        FilterKind::Contrast,
        FilterKind::Pixelate,
        FilterKind::GlassSphere,
        FilterKind::Crosshatch,
        FilterKind::Gamma,
    ];

    /// Shader mode index matched in `video_shader.wgsl`.
    pub fn shader_mode(self) -> u32 {
        match self {
            FilterKind::Original => 0,
            FilterKind::Sketch => 1,
            FilterKind::Invert => 2,
            FilterKind::Solarize => 3,
            FilterKind::Grayscale => 4,
            FilterKind::Brightness => 5,
            FilterKind::Contrast => 6,
            FilterKind::Pixelate => 7,
            FilterKind::GlassSphere => 8,
            FilterKind::Crosshatch => 9,
            FilterKind::Gamma => 10,
        }
    }

    /// Localized button label.
    pub fn label(self) -> String {
        match self {
            FilterKind::Original => crate::fl!("filter-original"),
            FilterKind::Sketch => crate::fl!("filter-sketch"),
            FilterKind::Invert => crate::fl!("filter-invert"),
            FilterKind::Solarize => crate::fl!("filter-solarize"),
            FilterKind::Grayscale => crate::fl!("filter-grayscale"),
            FilterKind::Brightness => crate::fl!("filter-brightness"),
            FilterKind::Contrast => crate::fl!("filter-contrast"),
            FilterKind::Pixelate => crate::fl!("filter-pixelate"),
            FilterKind::GlassSphere => crate::fl!("filter-glass-sphere"),
            FilterKind::Crosshatch => crate::fl!("filter-crosshatch"),
            FilterKind::Gamma => crate::fl!("filter-gamma"),
        }
    }
}

/// Main application state
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Whether camera access has been granted through the portal
    pub camera_access: CameraAccess,
    /// Currently selected preview filter
    pub selected_filter: FilterKind,
    /// Most recent frame from the capture pipeline
    pub current_frame: Option<Arc<CameraFrame>>,
    /// Frames received since startup, for diagnostics
    pub frames_received: u64,
}

/// All possible user interactions and system events
#[derive(Debug, Clone)]
pub enum Message {
    /// Result of the camera portal request
    CameraAccess(CameraAccess),
    /// New camera frame received from the pipeline
    CameraFrame(Arc<CameraFrame>),
    /// A filter button was pressed
    SelectFilter(FilterKind),
    /// Toggle horizontal mirroring of the preview
    ToggleMirrorPreview,
    /// Configuration file changed on disk
    UpdateConfig(Config),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_requires_granted_access() {
        assert!(!CameraAccess::Unknown.allows_capture());
        assert!(!CameraAccess::Denied.allows_capture());
        assert!(CameraAccess::Granted.allows_capture());
    }

    #[test]
    fn default_filter_is_original() {
        assert_eq!(FilterKind::default(), FilterKind::Original);
        assert_eq!(FilterKind::default().shader_mode(), 0);
    }

    #[test]
    fn filter_list_has_no_duplicates() {
        for (i, a) in FilterKind::ALL.iter().enumerate() {
            for b in &FilterKind::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn shader_modes_are_unique_and_dense() {
        let mut modes: Vec<u32> = FilterKind::ALL.iter().map(|f| f.shader_mode()).collect();
        modes.sort_unstable();
        let expected: Vec<u32> = (0..FilterKind::ALL.len() as u32).collect();
        assert_eq!(modes, expected);
    }
}
