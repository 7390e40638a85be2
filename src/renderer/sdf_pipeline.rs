//! SDF-based WebGPU render pipeline
//!
//! Replays a [`DrawList`] in the fragment shader using signed distance
//! fields: one storage buffer of shapes, one fullscreen triangle.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::surface::{DrawList, Primitive};
use super::viewport::Viewport;
use crate::Color;
use crate::error::GpuError;

/// Maximum number of shapes drawn per frame
pub const MAX_SHAPES: usize = 1024;

/// Page background behind the ring
pub const BACKGROUND: Color = Color::rgb(0xf2, 0xf2, 0xee);

const KIND_RECT: u32 = 0;
const KIND_CIRCLE: u32 = 1;
const KIND_ARC: u32 = 2;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2], // offset 0
    offset: [f32; 2],     // offset 8
    scale: f32,           // offset 16
    shape_count: u32,     // offset 20
    _pad: [u32; 2],       // offset 24
    background: [f32; 4], // offset 32 (16-byte aligned vec4)
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeData {
    pub kind: u32,
    pub line_width: f32,
    pub glow: f32,
    pub alpha: f32,
    pub color: [f32; 4],
    /// Rect: x, y, w, h. Circle/arc: cx, cy, r, 0
    pub a: [f32; 4],
    /// Arc: start, end, 0, 0
    pub b: [f32; 4],
}

fn linear_rgba(color: Color) -> [f32; 4] {
    let [r, g, b] = color.to_linear();
    [r, g, b, 1.0]
}

/// Pack recorded primitives into shader layout, dropping fully transparent
/// ones and anything past `max`
pub fn pack_shapes(list: &DrawList, max: usize) -> Vec<ShapeData> {
    list.primitives
        .iter()
        .filter(|p| p.paint().alpha > 0.0)
        .take(max)
        .map(|p| {
            let paint = p.paint();
            let mut shape = ShapeData {
                kind: 0,
                line_width: 0.0,
                glow: paint.glow,
                alpha: paint.alpha,
                color: linear_rgba(paint.color),
                a: [0.0; 4],
                b: [0.0; 4],
            };
            match *p {
                Primitive::Rect { origin, size, .. } => {
                    shape.kind = KIND_RECT;
                    shape.a = [origin.x, origin.y, size.x, size.y];
                }
                Primitive::Circle { center, radius, .. } => {
                    shape.kind = KIND_CIRCLE;
                    shape.a = [center.x, center.y, radius, 0.0];
                }
                Primitive::Arc {
                    center,
                    radius,
                    start,
                    end,
                    line_width,
                    ..
                } => {
                    shape.kind = KIND_ARC;
                    shape.line_width = line_width;
                    shape.a = [center.x, center.y, radius, 0.0];
                    shape.b = [start, end, 0.0, 0.0];
                }
            }
            shape
        })
        .collect()
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    shapes_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let viewport = Viewport::fit(width as f32, height as f32);
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                offset: viewport.offset.to_array(),
                scale: viewport.scale,
                shape_count: 0,
                _pad: [0; 2],
                background: linear_rgba(BACKGROUND),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let shapes_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shapes"),
            size: (std::mem::size_of::<ShapeData>() * MAX_SHAPES) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shapes_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!("SDF pipeline ready ({}x{})", width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            shapes_buffer,
            bind_group,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the draw list and present one frame
    pub fn render(&mut self, list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let shapes = pack_shapes(list, MAX_SHAPES);
        if shapes.len() < list.len() {
            log::trace!("Dropped {} shapes", list.len() - shapes.len());
        }

        let viewport = Viewport::fit(self.size.0 as f32, self.size.1 as f32);
        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            offset: viewport.offset.to_array(),
            scale: viewport.scale,
            shape_count: shapes.len() as u32,
            _pad: [0; 2],
            background: linear_rgba(BACKGROUND),
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        if !shapes.is_empty() {
            self.queue
                .write_buffer(&self.shapes_buffer, 0, bytemuck::cast_slice(&shapes));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::surface::{Paint, Surface};
    use glam::Vec2;

    #[test]
    fn test_shape_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<ShapeData>(), 64);
        assert_eq!(std::mem::size_of::<Globals>(), 48);
    }

    #[test]
    fn test_pack_shapes() {
        let mut list = DrawList::new();
        list.fill_rect(
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 4.0),
            Paint::solid(Color::BLACK),
        );
        list.stroke_arc(
            Vec2::new(300.0, 200.0),
            180.0,
            0.1,
            0.4,
            6.0,
            Paint::solid(Color::UNLIT).with_glow(15.0),
        );
        list.fill_circle(Vec2::ZERO, 2.0, Paint::solid(Color::UNLIT).with_alpha(0.0));

        let shapes = pack_shapes(&list, MAX_SHAPES);
        assert_eq!(shapes.len(), 2, "transparent circle dropped");
        assert_eq!(shapes[0].kind, KIND_RECT);
        assert_eq!(shapes[0].a, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(shapes[1].kind, KIND_ARC);
        assert_eq!(shapes[1].line_width, 6.0);
        assert_eq!(shapes[1].glow, 15.0);
        assert_eq!(shapes[1].b[..2], [0.1, 0.4]);
    }

    #[test]
    fn test_pack_shapes_cap() {
        let mut list = DrawList::new();
        for i in 0..10 {
            list.fill_circle(Vec2::splat(i as f32), 1.0, Paint::solid(Color::BLACK));
        }
        assert_eq!(pack_shapes(&list, 4).len(), 4);
    }
}
