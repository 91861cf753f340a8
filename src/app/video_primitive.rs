// SPDX-License-Identifier: GPL-3.0-only

//! Custom preview rendering primitive with direct GPU texture updates
//!
//! The preview texture persists across frames and is only recreated when the
//! frame dimensions change. Filters run entirely in the fragment shader, so
//! switching filters never touches the texture.

use crate::app::state::FilterKind;
use cosmic::iced::Rectangle;
use cosmic::iced_wgpu::graphics::Viewport;
use cosmic::iced_wgpu::primitive::{self, Primitive as PrimitiveTrait};
use cosmic::iced_wgpu::wgpu;
use std::sync::{Arc, Mutex};

/// Frame data staged for GPU upload
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, `width * 4` bytes per row
    pub rgba: Arc<[u8]>,
}

/// Uniform data consumed by the fragment shader
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PreviewUniform {
    /// Widget bounds in pixels
    viewport_size: [f32; 2],
    /// Content fit mode: 0 = Contain, 1 = Cover
    content_fit_mode: u32,
    /// Filter mode, see FilterKind::shader_mode
    filter_mode: u32,
    /// Corner radius in pixels (0 = no rounding)
    corner_radius: f32,
    /// Mirror horizontally: 0 = normal, 1 = mirrored
    mirror_horizontal: u32,
    /// Padding for 16-byte alignment
    _padding1: f32,
    _padding2: f32,
}

/// Frame and viewport data shared between the widget and the render thread.
/// One mutex for both, so the draw path takes a single lock per frame.
#[derive(Debug)]
pub struct FrameViewportData {
    pub frame: Option<PreviewFrame>,
    pub viewport: (f32, f32, crate::app::video_widget::VideoContentFit),
}

/// Custom primitive for the camera preview
#[derive(Debug, Clone)]
pub struct PreviewPrimitive {
    pub video_id: u64,
    pub data: Arc<Mutex<FrameViewportData>>,
    /// Filter to apply in the fragment shader
    pub filter: FilterKind,
    /// Corner radius in pixels (0 = no rounding)
    pub corner_radius: f32,
    /// Mirror horizontally (selfie mode)
    pub mirror_horizontal: bool,
}

/// Per-video GPU resources
struct VideoEntry {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    width: u32,
    height: u32,
}

/// Render pipeline shared by all preview primitives
pub struct PreviewPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    videos: std::collections::HashMap<u64, VideoEntry>,
}

impl PreviewPrimitive {
    pub fn new(video_id: u64) -> Self {
        use crate::app::video_widget::VideoContentFit;
        Self {
            video_id,
            data: Arc::new(Mutex::new(FrameViewportData {
                frame: None,
                viewport: (0.0, 0.0, VideoContentFit::Contain),
            })),
            filter: FilterKind::Original,
            corner_radius: 0.0,
            mirror_horizontal: false,
        }
    }

    pub fn update_frame(&self, frame: PreviewFrame) {
        if let Ok(mut guard) = self.data.lock() {
            guard.frame = Some(frame);
        }
    }

    pub fn update_viewport(
        &self,
        width: f32,
        height: f32,
        content_fit: crate::app::video_widget::VideoContentFit,
    ) {
        if let Ok(mut guard) = self.data.lock() {
            guard.viewport = (width, height, content_fit);
        }
    }
}

impl PrimitiveTrait for PreviewPrimitive {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        storage: &mut primitive::Storage,
        _bounds: &Rectangle,
        _viewport: &Viewport,
    ) {
        if !storage.has::<PreviewPipeline>() {
            storage.store(PreviewPipeline::new(device, format));
        }

        // Take frame and viewport with a brief lock, release before GPU ops
        let (frame_opt, viewport_data) = {
            if let Ok(mut guard) = self.data.lock() {
                (guard.frame.take(), guard.viewport)
            } else {
                return;
            }
        };

        if let Some(pipeline) = storage.get_mut::<PreviewPipeline>() {
            if let Some(frame) = frame_opt {
                pipeline.upload(device, queue, frame);
            }

            let (width, height, content_fit) = viewport_data;

            use crate::app::video_widget::VideoContentFit;
            let content_fit_mode = match content_fit {
                VideoContentFit::Contain => 0,
                VideoContentFit::Cover => 1,
            };

            let uniform = PreviewUniform {
                viewport_size: [width, height],
                content_fit_mode,
                filter_mode: self.filter.shader_mode(),
                corner_radius: self.corner_radius,
                mirror_horizontal: if self.mirror_horizontal { 1 } else { 0 },
                _padding1: 0.0,
                _padding2: 0.0,
            };

            if let Some(entry) = pipeline.videos.get(&self.video_id) {
                queue.write_buffer(&entry.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
            }
        }
    }

    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        storage: &primitive::Storage,
        target: &wgpu::TextureView,
        clip_bounds: &Rectangle<u32>,
    ) {
        if let Some(pipeline) = storage.get::<PreviewPipeline>() {
            pipeline.render(self.video_id, encoder, target, clip_bounds);
        }
    }
}

impl PreviewPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader_source = include_str!("video_shader.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("filtercam preview shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("filtercam preview bind group layout"),
            entries: &[
                // Frame texture
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Sampler
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                // Uniform
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("filtercam preview pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("filtercam preview pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("filtercam preview sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        Self {
            pipeline,
            bind_group_layout,
            sampler,
            videos: std::collections::HashMap::new(),
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: PreviewFrame) {
        if frame.width == 0 || frame.height == 0 {
            return;
        }

        // Recreate the texture only when frame dimensions change
        let needs_creation = match self.videos.get(&frame.id) {
            Some(entry) => entry.width != frame.width || entry.height != frame.height,
            None => true,
        };

        if needs_creation {
            let entry = self.create_entry(device, frame.width, frame.height);
            self.videos.insert(frame.id, entry);
        }

        if let Some(entry) = self.videos.get(&frame.id) {
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &entry.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &frame.rgba,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(frame.width * 4),
                    rows_per_image: None,
                },
                wgpu::Extent3d {
                    width: frame.width,
                    height: frame.height,
                    depth_or_array_layers: 1,
                },
            );
        }
    }

    fn create_entry(&self, device: &wgpu::Device, width: u32, height: u32) -> VideoEntry {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("filtercam preview texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("filtercam preview uniform buffer"),
            size: std::mem::size_of::<PreviewUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("filtercam preview bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        VideoEntry {
            texture,
            bind_group,
            uniform_buffer,
            width,
            height,
        }
    }

    pub fn render(
        &self,
        video_id: u64,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clip_bounds: &Rectangle<u32>,
    ) {
        if clip_bounds.width == 0 || clip_bounds.height == 0 {
            return;
        }

        if let Some(entry) = self.videos.get(&video_id) {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("filtercam preview render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_viewport(
                clip_bounds.x as f32,
                clip_bounds.y as f32,
                clip_bounds.width as f32,
                clip_bounds.height as f32,
                0.0,
                1.0,
            );

            render_pass.set_scissor_rect(
                clip_bounds.x,
                clip_bounds.y,
                clip_bounds.width,
                clip_bounds.height,
            );

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &entry.bind_group, &[]);
            render_pass.draw(0..6, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_is_32_bytes() {
        // Must match the Uniforms struct in video_shader.wgsl
        assert_eq!(std::mem::size_of::<PreviewUniform>(), 32);
        assert_eq!(std::mem::align_of::<PreviewUniform>(), 4);
    }
}
