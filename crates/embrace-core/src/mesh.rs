use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Interleaved vertex layout consumed by the mesh pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// CPU-side triangle mesh, built once per session and uploaded to the backend.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub(crate) fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(MeshVertex {
            position: position.to_array(),
            normal: normal.normalize_or_zero().to_array(),
        });
        index
    }

    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Axis-aligned bounds as `(min, max)`; `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from_array(self.vertices.first()?.position);
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            let p = Vec3::from_array(v.position);
            (lo.min(p), hi.max(p))
        }))
    }
}

/// UV sphere centred on the origin.
pub fn sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut mesh = MeshData::default();
    for r in 0..=rings {
        let theta = PI * r as f32 / rings as f32;
        for s in 0..=segments {
            let phi = TAU * s as f32 / segments as f32;
            let n = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            mesh.push_vertex(n * radius, n);
        }
    }
    let stride = segments + 1;
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            if r != 0 {
                mesh.push_triangle(a, a + 1, b);
            }
            if r != rings - 1 {
                mesh.push_triangle(a + 1, b + 1, b);
            }
        }
    }
    mesh
}

/// Where a cylinder's local origin sits along its axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pivot {
    Center,
    /// Origin at the top cap; the body hangs down along -Y. Used for limbs
    /// that rotate about a shoulder joint.
    Top,
}

/// Capped cylinder (or truncated cone) along the Y axis.
pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    segments: u32,
    pivot: Pivot,
) -> MeshData {
    let segments = segments.max(3);
    let (y_top, y_bottom) = match pivot {
        Pivot::Center => (height * 0.5, -height * 0.5),
        Pivot::Top => (0.0, -height),
    };
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);
    let mut mesh = MeshData::default();

    // Side wall
    for s in 0..=segments {
        let phi = TAU * s as f32 / segments as f32;
        let (sin, cos) = phi.sin_cos();
        let normal = Vec3::new(cos, slope, sin);
        mesh.push_vertex(Vec3::new(cos * radius_top, y_top, sin * radius_top), normal);
        mesh.push_vertex(
            Vec3::new(cos * radius_bottom, y_bottom, sin * radius_bottom),
            normal,
        );
    }
    for s in 0..segments {
        let top = s * 2;
        let bottom = top + 1;
        mesh.push_triangle(top, top + 2, bottom);
        mesh.push_triangle(bottom, top + 2, bottom + 2);
    }

    // Caps
    for (y, radius, normal) in [
        (y_top, radius_top, Vec3::Y),
        (y_bottom, radius_bottom, Vec3::NEG_Y),
    ] {
        let center = mesh.push_vertex(Vec3::new(0.0, y, 0.0), normal);
        let first = mesh.vertices.len() as u32;
        for s in 0..=segments {
            let phi = TAU * s as f32 / segments as f32;
            mesh.push_vertex(Vec3::new(phi.cos() * radius, y, phi.sin() * radius), normal);
        }
        for s in 0..segments {
            if normal.y > 0.0 {
                mesh.push_triangle(center, first + s + 1, first + s);
            } else {
                mesh.push_triangle(center, first + s, first + s + 1);
            }
        }
    }
    mesh
}
