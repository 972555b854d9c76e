use crate::constants::{DEPTH_FORMAT, MAX_DRAWS, PARTICLE_WORLD_SCALE};
use crate::dom;
use embrace_core::mesh::MeshData;
use embrace_core::{Material, RenderBackend, RenderFrame, ResourceId, SceneError, Viewport};
use fnv::FnvHashMap;
use web_sys as web;
use wgpu::util::DeviceExt;

mod helpers;
mod pipelines;
mod uniforms;

use helpers::backend_error;
use pipelines::{create_pipelines, Pipelines};
use uniforms::{DrawUniform, GlobalsUniform, MaterialUniform};

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuMaterial {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct GpuParticles {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    sizes: wgpu::Buffer,
    capacity: usize,
}

struct DepthTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTarget {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (texture, view) = helpers::create_texture(
            device,
            "depth_tex",
            width,
            height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        Self { texture, view }
    }
}

/// wgpu implementation of the scene's render backend. Owns the canvas it
/// draws into and every GPU buffer created on behalf of the session.
pub struct GpuState {
    canvas: web::HtmlCanvasElement,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    depth: DepthTarget,

    globals_buffer: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    draw_buffer: wgpu::Buffer,
    draw_bg: wgpu::BindGroup,
    draw_stride: u64,

    meshes: FnvHashMap<ResourceId, GpuMesh>,
    materials: FnvHashMap<ResourceId, GpuMaterial>,
    particles: FnvHashMap<ResourceId, GpuParticles>,
    next_id: u32,
    detached: bool,
}

impl GpuState {
    pub async fn new(canvas: web::HtmlCanvasElement, viewport: Viewport) -> anyhow::Result<Self> {
        dom::sync_canvas_backing_size(&canvas, viewport.width, viewport.height);
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipelines = create_pipelines(&device, format);
        let depth = DepthTarget::new(&device, width, height);

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_uniforms"),
            size: std::mem::size_of::<GlobalsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &pipelines.globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let draw_size = std::mem::size_of::<DrawUniform>() as u64;
        let draw_stride = helpers::align_to(
            draw_size,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniforms"),
            size: draw_stride * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let draw_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bg"),
            layout: &pipelines.draw_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(draw_size),
                }),
            }],
        });

        log::info!("[gpu] surface {:?} {}x{}", format, width, height);
        Ok(Self {
            canvas,
            surface,
            device,
            queue,
            config,
            pipelines,
            depth,
            globals_buffer,
            globals_bg,
            draw_buffer,
            draw_bg,
            draw_stride,
            meshes: FnvHashMap::default(),
            materials: FnvHashMap::default(),
            particles: FnvHashMap::default(),
            next_id: 1,
            detached: false,
        })
    }

    fn allocate_id(&mut self) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn live_resources(&self) -> usize {
        self.meshes.len() + self.materials.len() + self.particles.len()
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl RenderBackend for GpuState {
    fn create_geometry(&mut self, label: &str, mesh: &MeshData) -> Result<ResourceId, SceneError> {
        if mesh.indices.is_empty() {
            return Err(SceneError::Backend(format!("{}: empty mesh", label)));
        }
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let id = self.allocate_id();
        self.meshes.insert(
            id,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
            },
        );
        Ok(id)
    }

    fn create_material(
        &mut self,
        label: &str,
        material: &Material,
    ) -> Result<ResourceId, SceneError> {
        let uniform = MaterialUniform::from(material);
        let uniform_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(&uniform),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.pipelines.material_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let id = self.allocate_id();
        self.materials.insert(
            id,
            GpuMaterial {
                uniform_buffer,
                bind_group,
            },
        );
        Ok(id)
    }

    fn create_particle_buffer(
        &mut self,
        label: &str,
        capacity: usize,
    ) -> Result<ResourceId, SceneError> {
        if capacity == 0 {
            return Err(SceneError::Backend(format!("{}: zero capacity", label)));
        }
        let make = |suffix: &str, floats: usize| {
            self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{}_{}", label, suffix)),
                size: (floats * std::mem::size_of::<f32>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let particles = GpuParticles {
            positions: make("positions", capacity * 3),
            colors: make("colors", capacity * 3),
            sizes: make("sizes", capacity),
            capacity,
        };
        let id = self.allocate_id();
        self.particles.insert(id, particles);
        Ok(id)
    }

    fn release(&mut self, id: ResourceId) {
        if let Some(mesh) = self.meshes.remove(&id) {
            mesh.vertex_buffer.destroy();
            mesh.index_buffer.destroy();
        } else if let Some(material) = self.materials.remove(&id) {
            material.uniform_buffer.destroy();
        } else if let Some(particles) = self.particles.remove(&id) {
            particles.positions.destroy();
            particles.colors.destroy();
            particles.sizes.destroy();
        } else {
            log::debug!("[gpu] release of unknown resource {:?}", id);
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        if self.detached || viewport.width == 0 || viewport.height == 0 {
            return;
        }
        dom::sync_canvas_backing_size(&self.canvas, viewport.width, viewport.height);
        let width = self.canvas.width();
        let height = self.canvas.height();
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.reconfigure();
            self.depth.texture.destroy();
            self.depth = DepthTarget::new(&self.device, width, height);
        }
    }

    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), SceneError> {
        if self.detached {
            return Ok(());
        }
        let globals = GlobalsUniform::from_frame(
            frame,
            self.config.width,
            self.config.height,
            PARTICLE_WORLD_SCALE,
        );
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let draw_count = frame.draws.len().min(MAX_DRAWS);
        if frame.draws.len() > MAX_DRAWS {
            log::warn!("[gpu] {} draws exceed {} slots", frame.draws.len(), MAX_DRAWS);
        }
        for (i, draw) in frame.draws[..draw_count].iter().enumerate() {
            let uniform = DrawUniform::new(draw.model);
            self.queue.write_buffer(
                &self.draw_buffer,
                i as u64 * self.draw_stride,
                bytemuck::bytes_of(&uniform),
            );
        }

        let particle_count = match self.particles.get(&frame.particles.buffer) {
            Some(gpu) => {
                let count = frame.particles.sizes.len().min(gpu.capacity);
                self.queue.write_buffer(
                    &gpu.positions,
                    0,
                    bytemuck::cast_slice(&frame.particles.positions[..count * 3]),
                );
                self.queue.write_buffer(
                    &gpu.colors,
                    0,
                    bytemuck::cast_slice(&frame.particles.colors[..count * 3]),
                );
                self.queue.write_buffer(
                    &gpu.sizes,
                    0,
                    bytemuck::cast_slice(&frame.particles.sizes[..count]),
                );
                count as u32
            }
            None => 0,
        };

        let surface_tex = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.reconfigure();
                return Ok(());
            }
            Err(e) => return Err(backend_error("get_current_texture", e)),
        };
        let view = surface_tex
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let [r, g, b] = frame.clear_color;
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(&self.pipelines.mesh);
            rpass.set_bind_group(0, &self.globals_bg, &[]);
            for (i, draw) in frame.draws[..draw_count].iter().enumerate() {
                let (Some(mesh), Some(material)) = (
                    self.meshes.get(&draw.geometry),
                    self.materials.get(&draw.material),
                ) else {
                    continue;
                };
                let offset = (i as u64 * self.draw_stride) as u32;
                rpass.set_bind_group(1, &material.bind_group, &[]);
                rpass.set_bind_group(2, &self.draw_bg, &[offset]);
                rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            if let Some(gpu) = self.particles.get(&frame.particles.buffer) {
                if particle_count > 0 {
                    rpass.set_pipeline(&self.pipelines.particles);
                    rpass.set_bind_group(0, &self.globals_bg, &[]);
                    rpass.set_vertex_buffer(0, gpu.positions.slice(..));
                    rpass.set_vertex_buffer(1, gpu.colors.slice(..));
                    rpass.set_vertex_buffer(2, gpu.sizes.slice(..));
                    rpass.draw(0..6, 0..particle_count);
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        surface_tex.present();
        Ok(())
    }

    fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.depth.texture.destroy();
        self.globals_buffer.destroy();
        self.draw_buffer.destroy();
        self.canvas.remove();
        log::info!(
            "[gpu] surface detached; {} resources still tracked",
            self.live_resources()
        );
    }
}
