//! Light rig and fog. Lights are owned here, not by the figures: the two key
//! lights are related to a figure only through `anchors`, and they stay at the
//! figure's base offset whatever pose the figure is in.

use crate::clock::SimulationClock;
use crate::constants::*;
use crate::figure::FigureId;
use fnv::FnvHashMap;
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightId {
    Ambient,
    KeyLeft,
    KeyRight,
    Spot,
    Moon,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub base_intensity: f32,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub id: LightId,
    pub position: Vec3,
    pub color: [f32; 3],
    pub base_intensity: f32,
    pub intensity: f32,
    pub range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub target: Vec3,
    pub color: [f32; 3],
    pub base_intensity: f32,
    pub intensity: f32,
    pub angle: f32,
    pub penumbra: f32,
}

impl SpotLight {
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: [f32; 3],
    pub base_intensity: f32,
    pub intensity: f32,
}

/// Exponential-squared distance fog. Static for the session lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub density: f32,
}

impl Fog {
    /// Blend weight toward the fog color at `distance` from the eye.
    pub fn factor(&self, distance: f32) -> f32 {
        let d = self.density * distance.max(0.0);
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}

pub struct LightRig {
    pub ambient: AmbientLight,
    pub keys: [PointLight; 2],
    pub spot: SpotLight,
    pub moon: DirectionalLight,
    pub fog: Fog,
    anchors: FnvHashMap<FigureId, LightId>,
}

impl Default for LightRig {
    fn default() -> Self {
        Self::new()
    }
}

impl LightRig {
    pub fn new() -> Self {
        let key = |id: LightId, figure: FigureId| PointLight {
            id,
            position: figure.base_offset() + KEY_LIGHT_OFFSET,
            color: figure.color(),
            base_intensity: KEY_LIGHT_INTENSITY,
            intensity: KEY_LIGHT_INTENSITY,
            range: KEY_LIGHT_RANGE,
        };
        let mut anchors = FnvHashMap::default();
        anchors.insert(FigureId::Left, LightId::KeyLeft);
        anchors.insert(FigureId::Right, LightId::KeyRight);
        Self {
            ambient: AmbientLight {
                color: AMBIENT_COLOR,
                base_intensity: AMBIENT_INTENSITY,
                intensity: AMBIENT_INTENSITY,
            },
            keys: [
                key(LightId::KeyLeft, FigureId::Left),
                key(LightId::KeyRight, FigureId::Right),
            ],
            spot: SpotLight {
                position: SPOT_POSITION,
                target: CAMERA_FOCAL_POINT,
                color: SPOT_COLOR,
                base_intensity: SPOT_INTENSITY,
                intensity: SPOT_INTENSITY,
                angle: SPOT_ANGLE,
                penumbra: SPOT_PENUMBRA,
            },
            moon: DirectionalLight {
                direction: MOON_DIRECTION.normalize(),
                color: MOON_COLOR,
                base_intensity: MOON_INTENSITY,
                intensity: MOON_INTENSITY,
            },
            fog: Fog {
                color: FOG_COLOR,
                density: FOG_DENSITY,
            },
            anchors,
        }
    }

    /// Perturb every intensity around its base. Positions and fog are left
    /// alone.
    pub fn update(&mut self, clock: &SimulationClock) {
        let t = clock.elapsed_secs();
        self.keys[0].intensity = self.keys[0].base_intensity + KEY_LIGHT_AMPLITUDE * t.sin();
        self.keys[1].intensity = self.keys[1].base_intensity + KEY_LIGHT_AMPLITUDE * t.cos();
        self.spot.intensity = self.spot.base_intensity + SPOT_AMPLITUDE * (t * SPOT_RATE).sin();
        self.moon.intensity = self.moon.base_intensity + MOON_AMPLITUDE * (t * MOON_RATE).sin();
        self.ambient.intensity =
            self.ambient.base_intensity + AMBIENT_AMPLITUDE * (t * MOON_RATE).cos();
    }

    pub fn anchor_of(&self, figure: FigureId) -> Option<LightId> {
        self.anchors.get(&figure).copied()
    }

    pub fn point_light(&self, id: LightId) -> Option<&PointLight> {
        self.keys.iter().find(|k| k.id == id)
    }

    pub fn anchored_light(&self, figure: FigureId) -> Option<&PointLight> {
        self.anchor_of(figure).and_then(|id| self.point_light(id))
    }

    pub fn intensity(&self, id: LightId) -> f32 {
        match id {
            LightId::Ambient => self.ambient.intensity,
            LightId::KeyLeft => self.keys[0].intensity,
            LightId::KeyRight => self.keys[1].intensity,
            LightId::Spot => self.spot.intensity,
            LightId::Moon => self.moon.intensity,
        }
    }
}
