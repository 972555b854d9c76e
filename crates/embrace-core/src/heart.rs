//! Heart glyph: a closed outline of cubic Béziers, fill-tessellated once and
//! extruded into a thin slab. The mesh is immutable after construction; only
//! its `HeartPose` changes per frame.

use crate::error::SceneError;
use crate::mesh::MeshData;
use glam::{Mat4, Quat, Vec2, Vec3};
use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};

/// Outline in glyph units: notch at the top, tip at y = 100, symmetric
/// about x = 0. Y grows downward, as in 2D vector tools.
pub fn heart_path() -> Path {
    let mut builder = Path::builder();
    builder.begin(point(0.0, 30.0));
    builder.cubic_bezier_to(point(0.0, 0.0), point(50.0, 0.0), point(50.0, 30.0));
    builder.cubic_bezier_to(point(50.0, 55.0), point(25.0, 77.0), point(0.0, 100.0));
    builder.cubic_bezier_to(point(-25.0, 77.0), point(-50.0, 55.0), point(-50.0, 30.0));
    builder.cubic_bezier_to(point(-50.0, 0.0), point(0.0, 0.0), point(0.0, 30.0));
    builder.close();
    builder.build()
}

/// Build the extruded heart mesh, centred on the origin, upright (+Y up),
/// `size` units tall and `depth` units thick along Z.
pub fn build_heart_mesh(size: f32, depth: f32, tolerance: f32) -> Result<MeshData, SceneError> {
    let path = heart_path();

    let mut fill: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            &path,
            &FillOptions::tolerance(tolerance),
            &mut BuffersBuilder::new(&mut fill, |vertex: FillVertex| {
                vertex.position().to_array()
            }),
        )
        .map_err(|e| SceneError::Tessellation(format!("{:?}", e)))?;
    if fill.indices.is_empty() {
        return Err(SceneError::Tessellation("empty heart fill".into()));
    }

    let mut outline = Vec::new();
    for event in path.iter().flattened(tolerance) {
        match event {
            PathEvent::Line { from, to } => outline.push((from.to_array(), to.to_array())),
            PathEvent::End { last, first, close } if close && last != first => {
                outline.push((last.to_array(), first.to_array()))
            }
            _ => {}
        }
    }

    // Glyph units → upright scene units centred on the bounding box.
    let (lo, hi) = fill.vertices.iter().fold(
        (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
        |(lo, hi), p| (lo.min(Vec2::from(*p)), hi.max(Vec2::from(*p))),
    );
    let center = (lo + hi) * 0.5;
    let scale = size / (hi.y - lo.y).max(f32::EPSILON);
    let to_scene = |p: [f32; 2]| Vec2::new(p[0] - center.x, center.y - p[1]) * scale;

    let half = depth * 0.5;
    let mut mesh = MeshData::default();

    // Front and back caps share the fill triangulation with opposite winding.
    for (z, normal, reverse) in [(half, Vec3::Z, true), (-half, Vec3::NEG_Z, false)] {
        let base = mesh.vertices.len() as u32;
        for p in &fill.vertices {
            mesh.push_vertex(to_scene(*p).extend(z), normal);
        }
        for tri in fill.indices.chunks_exact(3) {
            if reverse {
                mesh.push_triangle(base + tri[0], base + tri[2], base + tri[1]);
            } else {
                mesh.push_triangle(base + tri[0], base + tri[1], base + tri[2]);
            }
        }
    }

    // Side walls: one quad per flattened outline edge. The outline winding
    // decides which edge perpendicular points outward.
    let edges: Vec<(Vec2, Vec2)> = outline
        .into_iter()
        .map(|(from, to)| (to_scene(from), to_scene(to)))
        .collect();
    let signed_area: f32 = edges.iter().map(|(a, b)| a.perp_dot(*b)).sum::<f32>() * 0.5;
    let outward = if signed_area >= 0.0 { 1.0 } else { -1.0 };
    for (a, b) in edges {
        let edge = b - a;
        if edge.length_squared() <= f32::EPSILON {
            continue;
        }
        let n = (Vec2::new(edge.y, -edge.x) * outward).extend(0.0);
        let i0 = mesh.push_vertex(a.extend(half), n);
        let i1 = mesh.push_vertex(b.extend(half), n);
        let i2 = mesh.push_vertex(b.extend(-half), n);
        let i3 = mesh.push_vertex(a.extend(-half), n);
        mesh.push_triangle(i0, i1, i2);
        mesh.push_triangle(i0, i2, i3);
    }

    Ok(mesh)
}

/// Per-frame placement of the heart glyph. A zero scale hides it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeartPose {
    pub translation: Vec3,
    pub scale: f32,
    pub spin: f32,
}

impl HeartPose {
    pub fn hidden(translation: Vec3) -> Self {
        Self {
            translation,
            scale: 0.0,
            spin: 0.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.scale > 0.0
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.spin),
            self.translation,
        )
    }
}
