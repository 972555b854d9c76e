pub mod camera;
pub mod clock;
pub mod constants;
pub mod error;
pub mod figure;
pub mod heart;
pub mod lighting;
pub mod mesh;
pub mod particles;
pub mod resources;
pub mod session;

pub use camera::*;
pub use clock::*;
pub use error::*;
pub use figure::*;
pub use heart::*;
pub use lighting::*;
pub use resources::*;
pub use session::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../../shaders/scene.wgsl");
pub static PARTICLES_WGSL: &str = include_str!("../../../shaders/particles.wgsl");
