//! Ambient "drifting embers" particle field.
//!
//! Particles live in parallel flat buffers (structure of arrays) so the
//! per-frame loop walks contiguous memory and the renderer can upload the
//! buffers as-is. The ensemble never grows or shrinks: particles wrap around
//! the bounding cuboid instead of dying.

use crate::clock::SimulationClock;
use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;

pub struct ParticleField {
    positions: Vec<f32>,
    velocities: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
}

impl ParticleField {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(count * 3);
        let mut velocities = Vec::with_capacity(count * 3);
        let mut colors = Vec::with_capacity(count * 3);
        let mut sizes = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(rng.gen_range(-PARTICLE_BOUND_XY..=PARTICLE_BOUND_XY));
            positions.push(rng.gen_range(-PARTICLE_BOUND_XY..=PARTICLE_BOUND_XY));
            positions.push(rng.gen_range(-PARTICLE_BOUND_Z..=PARTICLE_BOUND_Z));
            for _ in 0..3 {
                velocities.push(rng.gen_range(-PARTICLE_SPEED..=PARTICLE_SPEED));
            }
            let hue = EMBER_HUE_MIN + rng.gen::<f32>() * EMBER_HUE_SPAN;
            colors.extend_from_slice(&hsl_to_rgb(hue, EMBER_SATURATION, EMBER_LIGHTNESS));
            sizes.push(rng.gen_range(PARTICLE_SIZE_MIN..=PARTICLE_SIZE_MAX));
        }
        Self {
            positions,
            velocities,
            colors,
            sizes,
        }
    }

    /// Advance every particle by one frame. Mutates the position and color
    /// buffers in place; never allocates.
    pub fn update(&mut self, clock: &SimulationClock) {
        let t = clock.elapsed_secs();
        let shimmer_slot = (t * SHIMMER_RATE).floor() as usize % SHIMMER_WINDOW;
        let bounds = [PARTICLE_BOUND_XY, PARTICLE_BOUND_XY, PARTICLE_BOUND_Z];

        for (i, (pos, vel)) in self
            .positions
            .chunks_exact_mut(3)
            .zip(self.velocities.chunks_exact(3))
            .enumerate()
        {
            pos[0] += vel[0];
            pos[1] += vel[1];
            pos[2] += vel[2];

            pos[1] += (t + i as f32 * WAVE_INDEX_STEP).sin() * WAVE_AMPLITUDE;

            for axis in 0..3 {
                pos[axis] = wrap_coordinate(pos[axis], bounds[axis]);
            }

            if i % SHIMMER_WINDOW == shimmer_slot {
                let rgb = shimmer_color(t, i);
                self.colors[i * 3..i * 3 + 3].copy_from_slice(&rgb);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn velocities(&self) -> &[f32] {
        &self.velocities
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    pub fn color(&self, i: usize) -> [f32; 3] {
        [
            self.colors[i * 3],
            self.colors[i * 3 + 1],
            self.colors[i * 3 + 2],
        ]
    }
}

/// Teleport a coordinate that left `[-bound, bound]` to the opposite face.
/// This is deliberately not a bounce: velocity is untouched.
#[inline]
pub fn wrap_coordinate(value: f32, bound: f32) -> f32 {
    if value > bound {
        -bound
    } else if value < -bound {
        bound
    } else {
        value
    }
}

#[inline]
fn shimmer_color(t: f32, i: usize) -> [f32; 3] {
    let phase = t + i as f32;
    let hue = EMBER_HUE_MIN + EMBER_HUE_SPAN * (0.5 + 0.5 * (phase * 0.5).sin());
    let lightness = EMBER_LIGHTNESS + SHIMMER_LIGHTNESS_SPAN * (phase * 2.0).sin();
    hsl_to_rgb(hue, EMBER_SATURATION, lightness)
}

/// HSL → linear RGB. Hue wraps, saturation and lightness are clamped to [0, 1].
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let h = hue.rem_euclid(1.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);
    if s == 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
