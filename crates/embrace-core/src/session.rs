//! Scene lifecycle: one `SceneSession` per mount of the engine into a host
//! container. The session owns the backend, the camera and every simulated
//! entity, and drives them in lock-step once per tick.

use crate::camera::{Camera, HostContainer, ResizeOutcome, Viewport, ViewportResponder};
use crate::clock::SimulationClock;
use crate::constants::*;
use crate::error::SceneError;
use crate::figure::{AnimationPhase, FigureAnimator, FigureId, FigurePart, PartShape, ScenePose};
use crate::heart::build_heart_mesh;
use crate::lighting::LightRig;
use crate::mesh::{self, MeshData};
use crate::particles::ParticleField;
use crate::resources::{
    DrawItem, DrawList, Material, ParticleView, RenderBackend, RenderFrame, ResourceId,
    ResourceRegistry,
};
use std::time::Duration;

const HEART_GLOW: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeBinding {
    Part(FigureId, FigurePart),
    Heart,
}

#[derive(Clone, Copy, Debug)]
struct SceneNode {
    binding: NodeBinding,
    geometry: ResourceId,
    material: ResourceId,
}

struct SceneAssets {
    nodes: Vec<SceneNode>,
    particle_buffer: ResourceId,
}

struct MountedScene<B: RenderBackend> {
    backend: B,
    registry: ResourceRegistry,
    camera: Camera,
    responder: ViewportResponder,
    clock: SimulationClock,
    particles: ParticleField,
    particle_buffer: ResourceId,
    figures: FigureAnimator,
    lights: LightRig,
    nodes: Vec<SceneNode>,
    draws: DrawList,
}

pub struct SceneSession<B: RenderBackend> {
    seed: u64,
    mounted: Option<MountedScene<B>>,
}

impl<B: RenderBackend> Default for SceneSession<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: RenderBackend> SceneSession<B> {
    pub fn new() -> Self {
        Self::with_seed(PARTICLE_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            mounted: None,
        }
    }

    /// Mount into `container`, creating the backend with `create_backend`.
    ///
    /// A missing or zero-sized container and a failing backend leave the
    /// session unmounted; the error is logged and returned for the host to
    /// inspect, never raised further. If resource creation fails partway,
    /// everything created so far is released before returning.
    pub fn mount<F>(
        &mut self,
        container: Option<&dyn HostContainer>,
        create_backend: F,
    ) -> Result<(), SceneError>
    where
        F: FnOnce(Viewport) -> Result<B, SceneError>,
    {
        let result = self.try_mount(container, create_backend);
        match &result {
            Ok(()) => {
                if let Some(scene) = &self.mounted {
                    log::info!(
                        "[session] mounted {}x{} resources={} particles={}",
                        scene.responder.current().width,
                        scene.responder.current().height,
                        scene.registry.live(),
                        scene.particles.len()
                    );
                }
            }
            Err(e) if e.is_expected() => log::warn!("[session] mount skipped: {}", e),
            Err(e) => log::error!("[session] mount failed: {}", e),
        }
        result
    }

    fn try_mount<F>(
        &mut self,
        container: Option<&dyn HostContainer>,
        create_backend: F,
    ) -> Result<(), SceneError>
    where
        F: FnOnce(Viewport) -> Result<B, SceneError>,
    {
        if self.mounted.is_some() {
            return Err(SceneError::AlreadyMounted);
        }
        let container = container.ok_or(SceneError::MissingContainer)?;
        let size = container.pixel_size();
        let viewport = Viewport::from_size(size).ok_or_else(|| {
            let (width, height) = size.unwrap_or((0, 0));
            SceneError::EmptyViewport { width, height }
        })?;

        let mut backend = create_backend(viewport)?;
        let mut registry = ResourceRegistry::new();
        let assets = match build_assets(&mut backend, &mut registry) {
            Ok(assets) => assets,
            Err(e) => {
                let released = registry.release_all(&mut backend);
                backend.detach();
                log::warn!("[session] rolled back {} resources", released);
                return Err(e);
            }
        };

        let figures = FigureAnimator::default();
        self.mounted = Some(MountedScene {
            backend,
            registry,
            camera: Camera::framing(viewport.aspect()),
            responder: ViewportResponder::new(viewport),
            clock: SimulationClock::new(),
            particles: ParticleField::new(PARTICLE_COUNT, self.seed),
            particle_buffer: assets.particle_buffer,
            figures,
            lights: LightRig::new(),
            draws: DrawList::new(),
            nodes: assets.nodes,
        });
        Ok(())
    }

    /// One frame: particles, lights, figures, then a single render. Skipped
    /// entirely while unmounted.
    pub fn tick(&mut self, dt: Duration) {
        let Some(scene) = self.mounted.as_mut() else {
            return;
        };
        scene.clock.advance(dt);
        scene.particles.update(&scene.clock);
        scene.lights.update(&scene.clock);
        scene.figures.update(&scene.clock);
        scene.collect_draws();
        scene.render();
    }

    /// Viewport responder entry point for the host's resize notification.
    pub fn resize(&mut self, container: &dyn HostContainer) -> ResizeOutcome {
        match self.mounted.as_mut() {
            Some(scene) => {
                scene
                    .responder
                    .on_resize(container, &mut scene.camera, &mut scene.backend)
            }
            None => ResizeOutcome::Ignored,
        }
    }

    /// Release every backend resource and the output surface. Safe to call
    /// any number of times, including before a successful mount. Returns the
    /// number of resources released.
    pub fn unmount(&mut self) -> usize {
        let Some(mut scene) = self.mounted.take() else {
            log::debug!("[session] unmount ignored; not mounted");
            return 0;
        };
        let released = scene.registry.release_all(&mut scene.backend);
        scene.backend.detach();
        log::info!(
            "[session] unmounted after {} frames; released {} resources",
            scene.clock.frame(),
            released
        );
        released
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn live_resources(&self) -> usize {
        self.mounted.as_ref().map_or(0, |s| s.registry.live())
    }

    pub fn phase(&self) -> Option<AnimationPhase> {
        self.mounted
            .as_ref()
            .map(|s| s.figures.phase_clock().phase())
    }

    pub fn progress(&self) -> Option<f32> {
        self.mounted
            .as_ref()
            .map(|s| s.figures.phase_clock().progress())
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.mounted.as_ref().map(|s| s.clock.elapsed())
    }

    pub fn pose(&self) -> Option<&ScenePose> {
        self.mounted.as_ref().map(|s| s.figures.current())
    }

    pub fn particles(&self) -> Option<&ParticleField> {
        self.mounted.as_ref().map(|s| &s.particles)
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.mounted.as_ref().map(|s| &s.camera)
    }

    pub fn lights(&self) -> Option<&LightRig> {
        self.mounted.as_ref().map(|s| &s.lights)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.mounted.as_ref().map(|s| s.responder.current())
    }

    pub fn backend(&self) -> Option<&B> {
        self.mounted.as_ref().map(|s| &s.backend)
    }
}

impl<B: RenderBackend> Drop for SceneSession<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<B: RenderBackend> MountedScene<B> {
    fn collect_draws(&mut self) {
        let pose = self.figures.current();
        self.draws.clear();
        for node in &self.nodes {
            let model = match node.binding {
                NodeBinding::Part(figure, part) => pose.figure(figure).world_matrix(part),
                NodeBinding::Heart if pose.heart.is_visible() => pose.heart.to_mat4(),
                NodeBinding::Heart => continue,
            };
            self.draws.push(DrawItem {
                geometry: node.geometry,
                material: node.material,
                model,
            });
        }
    }

    fn render(&mut self) {
        let frame = RenderFrame {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            eye: self.camera.eye,
            time: self.clock.elapsed_secs(),
            clear_color: self.lights.fog.color,
            draws: &self.draws,
            particles: ParticleView {
                buffer: self.particle_buffer,
                positions: self.particles.positions(),
                colors: self.particles.colors(),
                sizes: self.particles.sizes(),
            },
            lights: &self.lights,
        };
        if let Err(e) = self.backend.render(&frame) {
            log::error!("[session] render error: {}", e);
        }
    }
}

fn part_mesh(shape: PartShape) -> MeshData {
    match shape {
        PartShape::Sphere { radius } => mesh::sphere(radius, 24, 16),
        PartShape::Cylinder {
            radius_top,
            radius_bottom,
            height,
            pivot,
        } => mesh::cylinder(radius_top, radius_bottom, height, 20, pivot),
    }
}

/// Create every backend resource the scene needs, registering each as it is
/// created so a failure partway can be rolled back by the caller.
fn build_assets<B: RenderBackend>(
    backend: &mut B,
    registry: &mut ResourceRegistry,
) -> Result<SceneAssets, SceneError> {
    let mut nodes = Vec::with_capacity(FigureId::ALL.len() * FigurePart::ALL.len() + 1);
    for figure in FigureId::ALL {
        let material = registry.material(
            backend,
            &format!("figure_{:?}_material", figure),
            &Material::solid(figure.color()),
        )?;
        for part in FigurePart::ALL {
            let geometry = registry.geometry(
                backend,
                &format!("figure_{:?}_{:?}", figure, part),
                &part_mesh(part.shape()),
            )?;
            nodes.push(SceneNode {
                binding: NodeBinding::Part(figure, part),
                geometry,
                material,
            });
        }
    }

    let heart_mesh = build_heart_mesh(HEART_SIZE, HEART_DEPTH, HEART_TOLERANCE)?;
    let heart_geometry = registry.geometry(backend, "heart_glyph", &heart_mesh)?;
    let heart_material = registry.material(
        backend,
        "heart_material",
        &Material::glowing(HEART_COLOR, HEART_GLOW),
    )?;
    nodes.push(SceneNode {
        binding: NodeBinding::Heart,
        geometry: heart_geometry,
        material: heart_material,
    });

    let particle_buffer = registry.particle_buffer(backend, "ember_particles", PARTICLE_COUNT)?;
    Ok(SceneAssets {
        nodes,
        particle_buffer,
    })
}
