// Host-side tests for the heart glyph mesh and the primitive meshes used by
// the figures.

use embrace_core::constants::{HEART_DEPTH, HEART_SIZE, HEART_TOLERANCE};
use embrace_core::mesh::{cylinder, sphere, MeshData, Pivot};
use embrace_core::{build_heart_mesh, heart_path, HeartPose};
use glam::Vec3;
use lyon::path::PathEvent;

fn assert_valid(mesh: &MeshData) {
    assert!(mesh.triangle_count() > 0);
    assert_eq!(mesh.indices.len() % 3, 0);
    let n = mesh.vertex_count() as u32;
    assert!(mesh.indices.iter().all(|&i| i < n), "index out of range");
    for tri in mesh.indices.chunks_exact(3) {
        assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
    }
    for v in &mesh.vertices {
        assert!(v.position.iter().all(|c| c.is_finite()));
        let len = Vec3::from_array(v.normal).length();
        assert!((len - 1.0).abs() < 1e-4, "normal length {len}");
    }
}

#[test]
fn heart_path_is_closed_and_bounded() {
    let mut closed = false;
    let mut max_y = f32::MIN;
    let mut max_abs_x = 0.0_f32;
    for event in heart_path().iter() {
        match event {
            PathEvent::Cubic { to, .. } => {
                max_y = max_y.max(to.y);
                max_abs_x = max_abs_x.max(to.x.abs());
            }
            PathEvent::End { close, .. } => closed = close,
            _ => {}
        }
    }
    assert!(closed);
    assert_eq!(max_y, 100.0);
    assert_eq!(max_abs_x, 50.0);
}

#[test]
fn heart_mesh_is_valid() {
    let mesh = build_heart_mesh(HEART_SIZE, HEART_DEPTH, HEART_TOLERANCE).expect("heart");
    assert_valid(&mesh);
}

#[test]
fn heart_mesh_is_sized_and_centred() {
    let mesh = build_heart_mesh(HEART_SIZE, HEART_DEPTH, HEART_TOLERANCE).expect("heart");
    let (lo, hi) = mesh.bounds().expect("non-empty");
    assert!((hi.y - lo.y - HEART_SIZE).abs() < 1e-4);
    assert!((hi.z - HEART_DEPTH * 0.5).abs() < 1e-6);
    assert!((lo.z + HEART_DEPTH * 0.5).abs() < 1e-6);
    assert!((lo.y + hi.y).abs() < 1e-4);
}

#[test]
fn heart_mesh_is_symmetric_about_vertical_axis() {
    let mesh = build_heart_mesh(HEART_SIZE, HEART_DEPTH, HEART_TOLERANCE).expect("heart");
    let (lo, hi) = mesh.bounds().expect("non-empty");
    assert!((lo.x + hi.x).abs() < 1e-3, "x range {} .. {}", lo.x, hi.x);
    let widest = |sign: f32| {
        mesh.vertices
            .iter()
            .map(|v| v.position[0] * sign)
            .fold(f32::MIN, f32::max)
    };
    assert!((widest(1.0) - widest(-1.0)).abs() < 1e-4);
}

#[test]
fn tip_points_down() {
    let mesh = build_heart_mesh(HEART_SIZE, HEART_DEPTH, HEART_TOLERANCE).expect("heart");
    let (lo, _) = mesh.bounds().expect("non-empty");
    let tip = mesh
        .vertices
        .iter()
        .map(|v| Vec3::from_array(v.position))
        .find(|p| (p.y - lo.y).abs() < 1e-4)
        .expect("tip vertex");
    assert!(tip.x.abs() < 1e-3);
}

#[test]
fn side_normals_point_outward() {
    let mesh = build_heart_mesh(HEART_SIZE, HEART_DEPTH, HEART_TOLERANCE).expect("heart");
    let mut side = 0;
    for v in &mesh.vertices {
        let n = Vec3::from_array(v.normal);
        if n.z.abs() > 0.5 {
            continue;
        }
        side += 1;
        // Step along the normal leaves the outline: farther from the glyph's
        // horizontal centre on the lobes' outer flanks.
        let p = Vec3::from_array(v.position);
        if p.y < 0.0 && p.x.abs() > 0.2 {
            assert!(n.x * p.x > 0.0, "inward normal at {p}");
        }
    }
    assert!(side > 0);
}

#[test]
fn hidden_heart_has_zero_scale() {
    let hidden = HeartPose::hidden(Vec3::Y);
    assert!(!hidden.is_visible());
    assert_eq!(hidden.to_mat4().transform_point3(Vec3::X), Vec3::Y);
}

#[test]
fn primitive_meshes_are_valid() {
    assert_valid(&sphere(0.42, 24, 16));
    assert_valid(&cylinder(0.42, 0.3, 1.5, 20, Pivot::Center));
    assert_valid(&cylinder(0.1, 0.1, 1.0, 20, Pivot::Top));
}

#[test]
fn top_pivot_cylinder_hangs_below_origin() {
    let (lo, hi) = cylinder(0.1, 0.1, 1.0, 12, Pivot::Top)
        .bounds()
        .expect("non-empty");
    assert!(hi.y.abs() < 1e-6);
    assert!((lo.y + 1.0).abs() < 1e-6);
}
