// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview widget rendering frames through a custom GPU primitive
//!
//! Frames arrive as packed RGBA and are uploaded straight into a persistent
//! texture; the selected filter runs in the fragment shader.

use crate::app::state::FilterKind;
use crate::app::video_primitive::{PreviewFrame, PreviewPrimitive};
use crate::backends::camera::CameraFrame;
use cosmic::iced::advanced::widget::Tree;
use cosmic::iced::advanced::{Widget, layout};
use cosmic::iced::{Element, Length, Rectangle, Size};
use cosmic::iced_wgpu::primitive::Renderer as PrimitiveRenderer;
use cosmic::{Renderer, Theme};
use std::sync::Arc;

/// Content fit mode for video scaling
#[derive(Debug, Clone, Copy)]
pub enum VideoContentFit {
    /// Scale to fit within bounds, maintaining aspect ratio (letterboxing)
    Contain,
    /// Scale to fill bounds completely, maintaining aspect ratio (cropping)
    Cover,
}

/// Configuration for creating a preview widget
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Identifier for the persistent GPU texture
    pub video_id: u64,
    /// How to scale content within bounds
    pub content_fit: VideoContentFit,
    /// Filter to apply to the preview
    pub filter: FilterKind,
    /// Corner radius for rounded corners (0.0 for sharp corners)
    pub corner_radius: f32,
    /// Whether to mirror the preview horizontally
    pub mirror_horizontal: bool,
}

/// Widget that renders camera frames using a custom GPU primitive
pub struct PreviewWidget {
    primitive: PreviewPrimitive,
    width: Length,
    height: Length,
    aspect_ratio: f32,
    content_fit: VideoContentFit,
}

impl PreviewWidget {
    pub fn new(frame: Arc<CameraFrame>, config: PreviewConfig) -> Self {
        let mut primitive = PreviewPrimitive::new(config.video_id);
        primitive.filter = config.filter;
        primitive.corner_radius = config.corner_radius;
        primitive.mirror_horizontal = config.mirror_horizontal;

        let aspect_ratio = if frame.height > 0 {
            frame.width as f32 / frame.height as f32
        } else {
            16.0 / 9.0
        };

        if frame.width > 0 && frame.height > 0 {
            primitive.update_frame(PreviewFrame {
                id: config.video_id,
                width: frame.width,
                height: frame.height,
                rgba: Arc::clone(&frame.rgba),
            });
        }

        Self {
            primitive,
            width: Length::Fill,
            height: Length::Fill,
            aspect_ratio,
            content_fit: config.content_fit,
        }
    }
}

impl Widget<crate::app::Message, Theme, Renderer> for PreviewWidget {
    fn size(&self) -> Size<Length> {
        Size::new(self.width, self.height)
    }

    fn layout(
        &self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        let max_size = limits.max();

        let final_size = match self.content_fit {
            VideoContentFit::Contain => {
                // Letterbox to the frame's aspect ratio
                let width = max_size.width;
                let height = max_size.height;

                let width_based_height = width / self.aspect_ratio;
                let height_based_width = height * self.aspect_ratio;

                if width_based_height <= height {
                    Size::new(width, width_based_height)
                } else {
                    Size::new(height_based_width, height)
                }
            }
            // The shader crops in Cover mode, so fill the container
            VideoContentFit::Cover => max_size,
        };

        layout::Node::new(final_size)
    }

    fn draw(
        &self,
        _tree: &Tree,
        renderer: &mut Renderer,
        _theme: &Theme,
        _style: &cosmic::iced::advanced::renderer::Style,
        layout: layout::Layout<'_>,
        _cursor: cosmic::iced::mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        let bounds = layout.bounds();

        self.primitive
            .update_viewport(bounds.width, bounds.height, self.content_fit);

        renderer.draw_primitive(bounds, self.primitive.clone());
    }
}

impl<'a> From<PreviewWidget> for Element<'a, crate::app::Message, Theme, Renderer> {
    fn from(widget: PreviewWidget) -> Self {
        Element::new(widget)
    }
}

/// Create a preview widget element from a camera frame
pub fn preview_widget<'a>(
    frame: Arc<CameraFrame>,
    config: PreviewConfig,
) -> Element<'a, crate::app::Message, Theme, Renderer> {
    Element::new(PreviewWidget::new(frame, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn test_frame(width: u32, height: u32) -> Arc<CameraFrame> {
        Arc::new(CameraFrame {
            width,
            height,
            rgba: Arc::from(vec![0u8; (width * height * 4) as usize].as_slice()),
            captured_at: Instant::now(),
        })
    }

    fn config_with_filter(filter: FilterKind) -> PreviewConfig {
        PreviewConfig {
            video_id: 0,
            content_fit: VideoContentFit::Cover,
            filter,
            corner_radius: 0.0,
            mirror_horizontal: false,
        }
    }

    #[test]
    fn widget_primitive_carries_configured_filter() {
        for filter in FilterKind::ALL {
            let widget = PreviewWidget::new(test_frame(4, 4), config_with_filter(filter));
            assert_eq!(widget.primitive.filter, filter);
            assert_eq!(
                widget.primitive.filter.shader_mode(),
                filter.shader_mode(),
            );
        }
    }

    #[test]
    fn widget_aspect_ratio_follows_frame() {
        let widget = PreviewWidget::new(test_frame(16, 9), config_with_filter(FilterKind::Original));
        assert!((widget.aspect_ratio - 16.0 / 9.0).abs() < f32::EPSILON);
    }
}
