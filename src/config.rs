// SPDX-License-Identifier: GPL-3.0-only

use crate::app::FilterKind;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Filter selected when the application was last closed
    pub last_filter: FilterKind,
    /// Mirror camera preview horizontally (selfie mode)
    pub mirror_preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            last_filter: FilterKind::default(),
            mirror_preview: true, // Default to mirrored (selfie mode)
        }
    }
}
