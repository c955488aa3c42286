//! WebGPU render pipeline setup

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};

/// Initial vertex capacity; grows by doubling
const INITIAL_VERTEX_CAPACITY: usize = 4096;

/// Scale that fits the field into the viewport without distortion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub field: (f32, f32),
    /// Share of each NDC axis the field occupies
    pub scale: (f32, f32),
}

impl Letterbox {
    pub fn new(field: (f32, f32), size: (u32, u32)) -> Self {
        let field_aspect = field.0 / field.1;
        let view_aspect = size.0 as f32 / size.1.max(1) as f32;
        let scale = if view_aspect > field_aspect {
            (field_aspect / view_aspect, 1.0)
        } else {
            (1.0, view_aspect / field_aspect)
        };
        Self { field, scale }
    }

    /// Map a top-left, y-down field position onto NDC
    pub fn to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        let nx = (x / self.field.0) * 2.0 - 1.0;
        let ny = 1.0 - (y / self.field.1) * 2.0;
        (nx * self.scale.0, ny * self.scale.1)
    }
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    /// Vertices the buffer can hold
    vertex_capacity: usize,
    /// Viewport size in pixels
    pub size: (u32, u32),
    pub letterbox: Letterbox,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        field: (f32, f32),
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("star-raid-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_pipeline(&device, format);
        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            size: (width, height),
            letterbox: Letterbox::new(field, (width, height)),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.letterbox = Letterbox::new(self.letterbox.field, self.size);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Convert field coordinates to normalized device coordinates
    pub fn game_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        self.letterbox.to_ndc(x, y)
    }

    /// Upload field-space vertices and draw them over the field backdrop
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        let (fw, fh) = self.letterbox.field;
        let mut ndc_vertices = Vec::with_capacity(vertices.len() + 6);
        ndc_vertices.extend(shapes::rect(Vec2::ZERO, Vec2::new(fw, fh), colors::BACKGROUND));
        ndc_vertices.extend(vertices.iter().copied());
        for v in &mut ndc_vertices {
            let (x, y) = self.letterbox.to_ndc(v.position[0], v.position[1]);
            v.position = [x, y];
        }

        if ndc_vertices.len() > self.vertex_capacity {
            self.vertex_capacity = ndc_vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {}", self.vertex_capacity);
        }
        self.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&ndc_vertices));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("field_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Letterbox bars
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.draw(0..ndc_vertices.len() as u32, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("vertex_buffer"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Flat-colored, alpha-blended triangle list
fn create_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("flat_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("flat_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("flat_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Map a field position onto NDC for a viewport of `size` pixels
pub fn field_to_ndc(field: (f32, f32), size: (u32, u32), x: f32, y: f32) -> (f32, f32) {
    Letterbox::new(field, size).to_ndc(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: (f32, f32) = (800.0, 600.0);

    #[test]
    fn test_corners_fill_matching_viewport() {
        assert_eq!(field_to_ndc(FIELD, (800, 600), 0.0, 0.0), (-1.0, 1.0));
        assert_eq!(field_to_ndc(FIELD, (800, 600), 800.0, 600.0), (1.0, -1.0));
        assert_eq!(field_to_ndc(FIELD, (400, 300), 400.0, 300.0), (0.0, 0.0));
    }

    #[test]
    fn test_wide_viewport_pillarboxes() {
        let (x, y) = field_to_ndc(FIELD, (1600, 600), 800.0, 0.0);
        assert!((x - 0.5).abs() < 1e-6);
        assert_eq!(y, 1.0);
    }

    #[test]
    fn test_tall_viewport_letterboxes() {
        let (x, y) = field_to_ndc(FIELD, (800, 1200), 0.0, 600.0);
        assert_eq!(x, -1.0);
        assert!((y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_height_viewport_does_not_divide_by_zero() {
        let letterbox = Letterbox::new(FIELD, (800, 0));
        assert!(letterbox.scale.0.is_finite());
        assert!(letterbox.scale.1.is_finite());
    }
}
