use embrace_core::{LightRig, Material, RenderFrame};
use glam::{Mat4, Vec3};

// Layouts mirror the WGSL structs in shaders/scene.wgsl and
// shaders/particles.wgsl; every member is 16-byte aligned.

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct GlobalsUniform {
    view_proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    eye: [f32; 4],
    ambient: [f32; 4],
    key_pos: [[f32; 4]; 2],
    key_color: [[f32; 4]; 2],
    spot_pos: [f32; 4],
    spot_dir: [f32; 4],
    spot_color: [f32; 4],
    moon_dir: [f32; 4],
    moon_color: [f32; 4],
    fog: [f32; 4],
    viewport: [f32; 4],
}

impl GlobalsUniform {
    pub(crate) fn from_frame(
        frame: &RenderFrame<'_>,
        width: u32,
        height: u32,
        particle_scale: f32,
    ) -> Self {
        let lights: &LightRig = frame.lights;
        let spot = &lights.spot;
        let cos_outer = spot.angle.cos();
        let cos_inner = (spot.angle * (1.0 - spot.penumbra)).cos();
        Self {
            view_proj: (frame.projection * frame.view).to_cols_array_2d(),
            view: frame.view.to_cols_array_2d(),
            proj: frame.projection.to_cols_array_2d(),
            eye: frame.eye.extend(frame.time).to_array(),
            ambient: rgb_w(lights.ambient.color, lights.ambient.intensity),
            key_pos: [
                lights.keys[0].position.extend(lights.keys[0].range).to_array(),
                lights.keys[1].position.extend(lights.keys[1].range).to_array(),
            ],
            key_color: [
                rgb_w(lights.keys[0].color, lights.keys[0].intensity),
                rgb_w(lights.keys[1].color, lights.keys[1].intensity),
            ],
            spot_pos: spot.position.extend(cos_outer).to_array(),
            spot_dir: spot.direction().extend(cos_inner).to_array(),
            spot_color: rgb_w(spot.color, spot.intensity),
            moon_dir: lights.moon.direction.extend(0.0).to_array(),
            moon_color: rgb_w(lights.moon.color, lights.moon.intensity),
            fog: rgb_w(lights.fog.color, lights.fog.density),
            viewport: [width as f32, height as f32, particle_scale, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MaterialUniform {
    color: [f32; 4],
    emissive: [f32; 4],
}

impl From<&Material> for MaterialUniform {
    fn from(m: &Material) -> Self {
        Self {
            color: rgb_w(m.color, m.opacity),
            emissive: rgb_w(m.emissive, 0.0),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct DrawUniform {
    model: [[f32; 4]; 4],
}

impl DrawUniform {
    pub(crate) fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

#[inline]
fn rgb_w(rgb: [f32; 3], w: f32) -> [f32; 4] {
    Vec3::from_array(rgb).extend(w).to_array()
}
