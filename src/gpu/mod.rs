//! wgpu drawing surface.
//!
//! [`GpuCanvas`] records the renderer's draw calls during a tick and replays
//! them in [`Surface::present`]:
//!
//! 1. Canvas pass into a persistent offscreen texture. Consecutive circles
//!    and rectangles share one instanced draw; every `stroke_segments` call is
//!    one line-list draw whose colour comes from a dynamic-offset uniform.
//! 2. Blit pass that draws the canvas onto the window as a quad, rotated by
//!    the current tilt under a perspective projection.
//!
//! The canvas texture keeps its contents between frames, so translucent
//! backgrounds leave motion trails as on a 2D canvas. Colours are written
//! premultiplied and blitted with premultiplied blending.
//!
//! Lines are one pixel wide; the stroke width argument is ignored here.

pub mod shaders;

use std::ops::Range;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use winit::window::Window;

use crate::error::GpuError;
use crate::graph::Segment;
use crate::surface::{Circle, Surface};
use shaders::{BLIT_SHADER, LINE_SHADER, SHAPE_SHADER};

const CANVAS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Distance from the eye to the untilted canvas, in canvas half-heights.
const CAMERA_DISTANCE: f32 = 3.0;

/// Window colour behind transparent canvas pixels.
const WINDOW_BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

const KIND_CIRCLE: u32 = 0;
const KIND_RECT: u32 = 1;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    viewport: [f32; 2],
    _pad: [f32; 2],
}

/// One circle or rectangle.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct ShapeInstance {
    center: [f32; 2],
    half_size: [f32; 2],
    color: [f32; 4],
    kind: u32,
    _pad: [u32; 3],
}

impl ShapeInstance {
    fn new(center: Vec2, half_size: Vec2, color: Vec3, alpha: f32, kind: u32) -> Self {
        Self {
            center: center.to_array(),
            half_size: half_size.to_array(),
            color: [color.x, color.y, color.z, alpha.clamp(0.0, 1.0)],
            kind,
            _pad: [0; 3],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct LineUniform {
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct BlitUniform {
    transform: [[f32; 4]; 4],
}

/// One recorded draw.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    /// Instanced shapes, a range into the frame's instance list.
    Shapes(Range<u32>),
    /// Line list, a vertex range plus an index into the frame's line styles.
    Lines { vertices: Range<u32>, style: u32 },
}

/// Draw calls recorded during one tick.
#[derive(Debug, Default)]
struct FrameRecording {
    commands: Vec<Command>,
    instances: Vec<ShapeInstance>,
    vertices: Vec<[f32; 2]>,
    styles: Vec<LineUniform>,
    clear: bool,
}

impl FrameRecording {
    fn push_shape(&mut self, shape: ShapeInstance) {
        let index = self.instances.len() as u32;
        self.instances.push(shape);
        match self.commands.last_mut() {
            Some(Command::Shapes(range)) if range.end == index => range.end += 1,
            _ => self.commands.push(Command::Shapes(index..index + 1)),
        }
    }

    fn push_lines(&mut self, segments: &[Segment], color: Vec3, alpha: f32) {
        if segments.is_empty() {
            return;
        }
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(bytemuck::cast_slice::<Segment, [f32; 2]>(segments));
        let end = self.vertices.len() as u32;

        self.styles.push(LineUniform {
            color: [color.x, color.y, color.z, alpha.clamp(0.0, 1.0)],
        });
        self.commands.push(Command::Lines {
            vertices: start..end,
            style: self.styles.len() as u32 - 1,
        });
    }

    /// Everything recorded so far would be cleared anyway.
    fn clear(&mut self) {
        self.commands.clear();
        self.instances.clear();
        self.vertices.clear();
        self.styles.clear();
        self.clear = true;
    }

    fn reset(&mut self) {
        self.clear();
        self.clear = false;
    }
}

/// Projection for the blit quad: a `width x height` canvas seen head-on
/// fills the viewport exactly; tilt rotates it about its center.
pub fn tilt_transform(width: u32, height: u32, rotate_x: f32, rotate_y: f32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    let fov = 2.0 * (1.0 / CAMERA_DISTANCE).atan();
    let projection = Mat4::perspective_rh(fov, aspect, 0.1, 100.0);
    projection
        * Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
        * Mat4::from_rotation_x(rotate_x.to_radians())
        * Mat4::from_rotation_y(rotate_y.to_radians())
        * Mat4::from_scale(Vec3::new(aspect, 1.0, 1.0))
}

/// Offscreen canvas texture and the blit bind group that samples it.
struct CanvasTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    blit_bind_group: wgpu::BindGroup,
}

impl CanvasTarget {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        blit_buffer: &wgpu::Buffer,
        width: u32,
        height: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Canvas Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CANVAS_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let blit_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: blit_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            _texture: texture,
            view,
            blit_bind_group,
        }
    }
}

/// Window-backed [`Surface`].
pub struct GpuCanvas {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: (u32, u32),

    shape_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,

    line_style_layout: wgpu::BindGroupLayout,
    line_style_buffer: wgpu::Buffer,
    line_style_bind_group: wgpu::BindGroup,
    /// Bytes between line styles; the uniform offset alignment.
    style_stride: u64,
    style_bytes: Vec<u8>,

    instance_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,

    blit_layout: wgpu::BindGroupLayout,
    blit_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    canvas: CanvasTarget,

    frame: FrameRecording,
    tilt: (f32, f32),
}

impl GpuCanvas {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Canvas Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Palette colours are already display values, so the swapchain
        // should not re-encode them.
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8Unorm);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Group 0: globals shared by the canvas pipelines
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        // Group 1 of the line pipeline: per-draw colour
        let line_style_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Line Style Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<LineUniform>() as u64),
                },
                count: None,
            }],
        });
        let style_stride = (device.limits().min_uniform_buffer_offset_alignment as u64)
            .max(std::mem::size_of::<LineUniform>() as u64);
        let line_style_buffer = create_buffer(
            &device,
            "Line Style Buffer",
            style_stride * 16,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let line_style_bind_group = line_style_bind_group(&device, &line_style_layout, &line_style_buffer);

        // Blit: canvas texture + sampler + transform
        let blit_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit Layout"),
            entries: &[
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
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let blit_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Blit Buffer"),
            size: std::mem::size_of::<BlitUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Canvas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let canvas = CanvasTarget::new(&device, &blit_layout, &sampler, &blit_buffer, config.width, config.height);

        // Canvas colour is premultiplied: colour scales by source alpha, alpha
        // accumulates source-over.
        let canvas_blend = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let shape_pipeline = create_pipeline(
            &device,
            "Shape",
            SHAPE_SHADER,
            &[&globals_layout],
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<ShapeInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x2,
                    1 => Float32x2,
                    2 => Float32x4,
                    3 => Uint32,
                ],
            }],
            wgpu::PrimitiveTopology::TriangleList,
            CANVAS_FORMAT,
            canvas_blend,
        );

        let line_pipeline = create_pipeline(
            &device,
            "Line",
            LINE_SHADER,
            &[&globals_layout, &line_style_layout],
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x2],
            }],
            wgpu::PrimitiveTopology::LineList,
            CANVAS_FORMAT,
            canvas_blend,
        );

        let blit_pipeline = create_pipeline(
            &device,
            "Blit",
            BLIT_SHADER,
            &[&blit_layout],
            &[],
            wgpu::PrimitiveTopology::TriangleList,
            format,
            wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
        );

        let instance_buffer = create_buffer(
            &device,
            "Shape Instance Buffer",
            (std::mem::size_of::<ShapeInstance>() * 256) as u64,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );
        let vertex_buffer = create_buffer(
            &device,
            "Line Vertex Buffer",
            (std::mem::size_of::<[f32; 2]>() * 1024) as u64,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );

        Ok(Self {
            surface,
            device,
            queue,
            size: (config.width, config.height),
            config,
            shape_pipeline,
            line_pipeline,
            blit_pipeline,
            globals_buffer,
            globals_bind_group,
            line_style_layout,
            line_style_buffer,
            line_style_bind_group,
            style_stride,
            style_bytes: Vec::new(),
            instance_buffer,
            vertex_buffer,
            blit_layout,
            blit_buffer,
            sampler,
            canvas,
            frame: FrameRecording {
                clear: true,
                ..Default::default()
            },
            tilt: (0.0, 0.0),
        })
    }

    /// Copy the recorded frame into GPU buffers, growing them if needed.
    fn upload(&mut self) {
        let (width, height) = self.size;
        let globals = Globals {
            viewport: [width.max(1) as f32, height.max(1) as f32],
            _pad: [0.0; 2],
        };
        self.queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let blit = BlitUniform {
            transform: tilt_transform(width, height, self.tilt.0, self.tilt.1).to_cols_array_2d(),
        };
        self.queue.write_buffer(&self.blit_buffer, 0, bytemuck::bytes_of(&blit));

        if !self.frame.instances.is_empty() {
            let bytes: &[u8] = bytemuck::cast_slice(&self.frame.instances);
            ensure_capacity(&self.device, &mut self.instance_buffer, "Shape Instance Buffer", bytes.len() as u64);
            self.queue.write_buffer(&self.instance_buffer, 0, bytes);
        }

        if !self.frame.vertices.is_empty() {
            let bytes: &[u8] = bytemuck::cast_slice(&self.frame.vertices);
            ensure_capacity(&self.device, &mut self.vertex_buffer, "Line Vertex Buffer", bytes.len() as u64);
            self.queue.write_buffer(&self.vertex_buffer, 0, bytes);
        }

        if !self.frame.styles.is_empty() {
            let stride = self.style_stride as usize;
            self.style_bytes.clear();
            self.style_bytes.resize(self.frame.styles.len() * stride, 0);
            for (chunk, style) in self.style_bytes.chunks_exact_mut(stride).zip(&self.frame.styles) {
                chunk[..std::mem::size_of::<LineUniform>()].copy_from_slice(bytemuck::bytes_of(style));
            }
            let needed = self.style_bytes.len() as u64;
            if ensure_capacity(&self.device, &mut self.line_style_buffer, "Line Style Buffer", needed) {
                self.line_style_bind_group =
                    line_style_bind_group(&self.device, &self.line_style_layout, &self.line_style_buffer);
            }
            self.queue.write_buffer(&self.line_style_buffer, 0, &self.style_bytes);
        }
    }

    fn encode_canvas_pass(&self, encoder: &mut wgpu::CommandEncoder) {
        let load = if self.frame.clear {
            wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT)
        } else {
            wgpu::LoadOp::Load
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Canvas Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.canvas.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(0, &self.globals_bind_group, &[]);
        for command in &self.frame.commands {
            match command {
                Command::Shapes(instances) => {
                    pass.set_pipeline(&self.shape_pipeline);
                    pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
                    pass.draw(0..6, instances.clone());
                }
                Command::Lines { vertices, style } => {
                    let offset = (*style as u64 * self.style_stride) as u32;
                    pass.set_pipeline(&self.line_pipeline);
                    pass.set_bind_group(1, &self.line_style_bind_group, &[offset]);
                    pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                    pass.draw(vertices.clone(), 0..1);
                }
            }
        }
    }

    fn encode_blit_pass(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Blit Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(WINDOW_BACKGROUND),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.blit_pipeline);
        pass.set_bind_group(0, &self.canvas.blit_bind_group, &[]);
        pass.draw(0..6, 0..1);
    }
}

impl Surface for GpuCanvas {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        // Minimised windows report zero; keep the last configuration.
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.canvas = CanvasTarget::new(
            &self.device,
            &self.blit_layout,
            &self.sampler,
            &self.blit_buffer,
            width,
            height,
        );
        self.frame.clear = true;
    }

    fn clear(&mut self) {
        self.frame.clear();
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Vec3, alpha: f32) {
        let half = size * 0.5;
        self.frame
            .push_shape(ShapeInstance::new(origin + half, half, color, alpha, KIND_RECT));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32) {
        self.frame
            .push_shape(ShapeInstance::new(center, Vec2::splat(radius), color, alpha, KIND_CIRCLE));
    }

    fn fill_circles(&mut self, circles: &[Circle], color: Vec3, alpha: f32) {
        for circle in circles {
            self.fill_circle(circle.center, circle.radius, color, alpha);
        }
    }

    fn stroke_segments(&mut self, segments: &[Segment], color: Vec3, alpha: f32, _width: f32) {
        self.frame.push_lines(segments, color, alpha);
    }

    fn present(&mut self) {
        if self.size.0 == 0 || self.size.1 == 0 {
            self.frame.reset();
            return;
        }

        self.upload();
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Canvas Encoder"),
        });
        self.encode_canvas_pass(&mut encoder);

        let output = match self.surface.get_current_texture() {
            Ok(output) => Some(output),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("GPU surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                None
            }
        };

        // The canvas pass runs even when the frame is skipped so fading
        // backgrounds stay in step with the simulation.
        if let Some(output) = &output {
            let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
            self.encode_blit_pass(&mut encoder, &view);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        if let Some(output) = output {
            output.present();
        }

        self.frame.reset();
    }

    fn set_tilt(&mut self, rotate_x: f32, rotate_y: f32) {
        self.tilt = (rotate_x, rotate_y);
    }
}

fn create_buffer(device: &wgpu::Device, label: &str, size: u64, usage: wgpu::BufferUsages) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage,
        mapped_at_creation: false,
    })
}

/// Replace `buffer` with a larger one if it cannot hold `needed` bytes.
/// Returns whether it was replaced.
fn ensure_capacity(device: &wgpu::Device, buffer: &mut wgpu::Buffer, label: &str, needed: u64) -> bool {
    if buffer.size() >= needed {
        return false;
    }
    let size = needed.next_power_of_two();
    log::debug!("growing {} to {} bytes", label, size);
    *buffer = create_buffer(device, label, size, buffer.usage());
    true
}

fn line_style_bind_group(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, buffer: &wgpu::Buffer) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Line Style Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<LineUniform>() as u64),
            }),
        }],
    })
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &wgpu::Device,
    name: &str,
    source: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    buffers: &[wgpu::VertexBufferLayout<'_>],
    topology: wgpu::PrimitiveTopology,
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} Shader", name)),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Pipeline Layout", name)),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", name)),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
