//! wgpu renderer drawing a scene graph to a winit window surface

use std::{collections::HashMap, iter, ops::Range, sync::Arc};

use bytemuck::{Pod, Zeroable};
use cgmath::Matrix4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::{
    depth_texture::DepthTexture,
    instance::{batch_draw_items, InstanceData},
    renderer::{RenderBackend, Renderer},
};
use crate::{
    error::{InitError, RenderError},
    gfx::{
        camera::PerspectiveCamera,
        context::ViewportSize,
        geometry::GeometryData,
        scene::{Scene, Vertex3D},
    },
    wgpu_utils::{InstanceBuffer, UniformBuffer},
};

/// Frames a cached mesh survives without being drawn
const MESH_EVICTION_FRAMES: u64 = 120;

const DEFAULT_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.2,
    b: 0.3,
    a: 1.0,
};

/// Ambient term used when the scene has no environment
const DEFAULT_AMBIENT: f32 = 0.15;

/// Per-frame shader globals. Must match `Globals` in mesh.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    /// xyz = travel direction, w = intensity
    pub light_dir: [f32; 4],
    pub light_color: [f32; 4],
    pub ambient: [f32; 4],
}

impl GlobalUniform {
    /// Camera and first directional light of the scene
    pub fn from_scene(scene: &Scene, camera: &PerspectiveCamera) -> Self {
        let view_proj: Matrix4<f32> = camera.view_projection_matrix();
        let eye = camera.position;

        let (light_dir, light_color) = match scene.lights().first() {
            Some(world) => {
                let [r, g, b] = world.light.color.to_array();
                (
                    [
                        world.direction.x,
                        world.direction.y,
                        world.direction.z,
                        world.light.intensity,
                    ],
                    [r, g, b, 1.0],
                )
            }
            None => ([0.0, -1.0, 0.0, 0.0], [0.0; 4]),
        };

        let ambient = match &scene.environment {
            Some(env) => {
                let [r, g, b] = env.color.to_array();
                [r * env.intensity, g * env.intensity, b * env.intensity, 1.0]
            }
            None => [DEFAULT_AMBIENT, DEFAULT_AMBIENT, DEFAULT_AMBIENT, 1.0],
        };

        Self {
            view_proj: view_proj.into(),
            eye: [eye.x, eye.y, eye.z, 1.0],
            light_dir,
            light_color,
            ambient,
        }
    }
}

/// Creates [`WgpuRenderer`]s for one window
pub struct WgpuBackend {
    window: Arc<Window>,
    vsync: bool,
}

impl WgpuBackend {
    pub fn new(window: Arc<Window>, vsync: bool) -> Self {
        Self { window, vsync }
    }
}

impl RenderBackend for WgpuBackend {
    fn create_renderer(&mut self, size: ViewportSize) -> Result<Box<dyn Renderer>, InitError> {
        let renderer = pollster::block_on(WgpuRenderer::new(
            Arc::clone(&self.window),
            size,
            self.vsync,
        ))?;
        Ok(Box::new(renderer))
    }
}

struct GpuMesh {
    // Held so the cache key (the geometry's address) stays unique
    _geometry: Arc<GeometryData>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    last_used: u64,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, geometry: &Arc<GeometryData>, frame: u64) -> Self {
        let vertices: Vec<Vertex3D> = geometry.to_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            _geometry: Arc::clone(geometry),
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            last_used: frame,
        }
    }
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: DepthTexture,
    pipeline: wgpu::RenderPipeline,
    globals: UniformBuffer<GlobalUniform>,
    global_bind_group: wgpu::BindGroup,
    instances: InstanceBuffer<InstanceData>,
    meshes: HashMap<usize, GpuMesh>,
    frame: u64,
}

pub struct WgpuRenderer {
    state: Option<GpuState>,
}

impl WgpuRenderer {
    pub async fn new(
        window: Arc<Window>,
        size: ViewportSize,
        vsync: bool,
    ) -> Result<Self, InitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|err| InitError::Surface(err.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| InitError::Adapter(err.to_string()))?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|err| InitError::Device(err.to_string()))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| InitError::Surface("surface reports no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_texture = DepthTexture::create(&device, &config, "depth_texture");

        let globals = UniformBuffer::<GlobalUniform>::new(&device);
        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals.binding_resource(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&global_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc(), InstanceData::vertex_buffer_layout()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTexture::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        let instances = InstanceBuffer::new(&device, 256);

        Ok(Self {
            state: Some(GpuState {
                surface,
                device,
                queue,
                config,
                depth_texture,
                pipeline,
                globals,
                global_bind_group,
                instances,
                meshes: HashMap::new(),
                frame: 0,
            }),
        })
    }
}

impl GpuState {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring surface texture, skipping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(err) => return Err(RenderError::Surface(err.to_string())),
        };

        self.frame += 1;
        let frame = self.frame;
        self.globals
            .update_content(&self.queue, GlobalUniform::from_scene(scene, camera));

        let items = scene.draw_items();
        let batches = batch_draw_items(&items);

        let mut instance_data = Vec::with_capacity(items.len());
        let mut draws: Vec<(usize, Range<u32>)> = Vec::with_capacity(batches.len());
        for batch in &batches {
            let geometry = items[batch.first_item].shape.geometry();
            if geometry.indices.is_empty() {
                continue;
            }
            let mesh = self
                .meshes
                .entry(batch.geometry_key)
                .or_insert_with(|| GpuMesh::new(&self.device, geometry, frame));
            mesh.last_used = frame;

            let start = instance_data.len() as u32;
            instance_data.extend_from_slice(&batch.instances);
            draws.push((batch.geometry_key, start..instance_data.len() as u32));
        }
        self.instances
            .upload(&self.device, &self.queue, &instance_data);

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let clear = scene.background.map_or(DEFAULT_CLEAR, |color| wgpu::Color {
            r: f64::from(color.r),
            g: f64::from(color.g),
            b: f64::from(color.b),
            a: 1.0,
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.global_bind_group, &[]);

            for (key, range) in &draws {
                let Some(mesh) = self.meshes.get(key) else {
                    continue;
                };
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instances.slice(range.clone()));
                render_pass
                    .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..(range.end - range.start));
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        surface_texture.present();

        self.meshes
            .retain(|_, mesh| frame - mesh.last_used < MESH_EVICTION_FRAMES);
        log::trace!(
            "Frame {} drew {} items in {} batches",
            frame,
            items.len(),
            draws.len()
        );
        Ok(())
    }

    fn resize(&mut self, size: ViewportSize) {
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = DepthTexture::create(&self.device, &self.config, "depth_texture");
    }
}

impl Renderer for WgpuRenderer {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        self.state
            .as_mut()
            .ok_or(RenderError::Disposed)?
            .render(scene, camera)
    }

    fn resize(&mut self, size: ViewportSize) {
        if let Some(state) = self.state.as_mut() {
            state.resize(size);
        }
    }

    fn dispose(&mut self) {
        if let Some(state) = self.state.take() {
            log::debug!("Releasing {} cached meshes", state.meshes.len());
        }
    }
}
