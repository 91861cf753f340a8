// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! A single screen: camera preview on top, filter bar below. Until access
//! is granted (or after it is refused) the preview area shows a status text
//! instead.

use crate::app::state::{AppModel, CameraAccess, FilterKind, Message};
use crate::app::video_widget::{self, PreviewConfig, VideoContentFit};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::Length;
use cosmic::widget;
use std::sync::Arc;

/// Texture id of the main preview surface
const PREVIEW_VIDEO_ID: u64 = 0;

/// Configuration of the main preview surface.
///
/// Cover mode fills the preview area and crops the excess, the way camera
/// viewfinders behave.
fn preview_config(filter: FilterKind, mirror_horizontal: bool) -> PreviewConfig {
    PreviewConfig {
        video_id: PREVIEW_VIDEO_ID,
        content_fit: VideoContentFit::Cover,
        filter,
        corner_radius: ui::PREVIEW_CORNER_RADIUS,
        mirror_horizontal,
    }
}

impl AppModel {
    /// Build the main application view.
    pub fn view(&self) -> Element<'_, Message> {
        let preview = self.build_preview();

        let content = widget::column()
            .spacing(ui::FILTER_BAR_SPACING)
            .push(widget::container(preview).center(Length::Fill))
            .push(self.filter_bar());

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(ui::CONTENT_PADDING)
            .into()
    }

    fn build_preview(&self) -> Element<'_, Message> {
        match self.camera_access {
            CameraAccess::Denied => status_text(fl!("camera-denied")),
            CameraAccess::Unknown | CameraAccess::Granted => match &self.current_frame {
                Some(frame) => video_widget::preview_widget(
                    Arc::clone(frame),
                    preview_config(self.selected_filter, self.config.mirror_preview),
                ),
                None => status_text(fl!("camera-waiting")),
            },
        }
    }
}

fn status_text<'a>(text: String) -> Element<'a, Message> {
    widget::container(widget::text::title4(text))
        .center(Length::Fill)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_crops_to_fill() {
        let config = preview_config(FilterKind::Original, true);
        assert!(matches!(config.content_fit, VideoContentFit::Cover));
    }

    #[test]
    fn preview_carries_selected_filter() {
        for filter in FilterKind::ALL {
            let config = preview_config(filter, false);
            assert_eq!(config.filter, filter);
        }
    }
}
