// Host-side tuning for the web front end.
//
// Simulation constants live in `embrace_core::constants`; these only shape
// how the browser drives and presents the scene.

// Longest frame delta fed to the simulation (seconds). Background tabs can
// report multi-second gaps.
pub const MAX_FRAME_DT_SEC: f32 = 0.1;

// Upper bound on devicePixelRatio used for the canvas backing store
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Class applied to the canvas we append into the host container
pub const CANVAS_CLASS: &str = "embrace-canvas";

// Billboard half-size per unit of particle size (world units)
pub const PARTICLE_WORLD_SCALE: f32 = 0.35;

// Draw uniforms are bound with dynamic offsets; one slot per mesh node
pub const MAX_DRAWS: usize = 16;

// Depth attachment format for the scene pass
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;
