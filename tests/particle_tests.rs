// Host-side tests for the ember particle field.

use embrace_core::constants::*;
use embrace_core::particles::{hsl_to_rgb, wrap_coordinate, ParticleField};
use embrace_core::SimulationClock;
use std::time::Duration;

fn assert_in_bounds(field: &ParticleField) {
    for i in 0..field.len() {
        let p = field.position(i);
        assert!(p.x.abs() <= PARTICLE_BOUND_XY, "particle {i} x={}", p.x);
        assert!(p.y.abs() <= PARTICLE_BOUND_XY, "particle {i} y={}", p.y);
        assert!(p.z.abs() <= PARTICLE_BOUND_Z, "particle {i} z={}", p.z);
    }
}

#[test]
fn field_starts_with_fixed_count_inside_bounds() {
    let field = ParticleField::new(PARTICLE_COUNT, PARTICLE_SEED);
    assert_eq!(field.len(), PARTICLE_COUNT);
    assert_eq!(field.positions().len(), PARTICLE_COUNT * 3);
    assert_eq!(field.velocities().len(), PARTICLE_COUNT * 3);
    assert_eq!(field.colors().len(), PARTICLE_COUNT * 3);
    assert_eq!(field.sizes().len(), PARTICLE_COUNT);
    assert_in_bounds(&field);
    assert!(field
        .sizes()
        .iter()
        .all(|s| (PARTICLE_SIZE_MIN..=PARTICLE_SIZE_MAX).contains(s)));
    assert!(field
        .velocities()
        .iter()
        .all(|v| v.abs() <= PARTICLE_SPEED));
}

#[test]
fn positions_stay_bounded_over_long_runs() {
    let mut field = ParticleField::new(PARTICLE_COUNT, 7);
    let mut clock = SimulationClock::new();
    for _ in 0..20_000 {
        clock.advance(Duration::from_millis(16));
        field.update(&clock);
    }
    assert_eq!(field.len(), PARTICLE_COUNT);
    assert_in_bounds(&field);
}

#[test]
fn same_seed_gives_same_field() {
    let a = ParticleField::new(64, 99);
    let b = ParticleField::new(64, 99);
    let c = ParticleField::new(64, 100);
    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.colors(), b.colors());
    assert_ne!(a.positions(), c.positions());
}

#[test]
fn wrap_teleports_to_opposite_face() {
    assert_eq!(wrap_coordinate(100.5, 100.0), -100.0);
    assert_eq!(wrap_coordinate(-100.5, 100.0), 100.0);
    assert_eq!(wrap_coordinate(100.0, 100.0), 100.0);
    assert_eq!(wrap_coordinate(-3.25, 100.0), -3.25);
}

#[test]
fn wrap_keeps_velocity() {
    let mut field = ParticleField::new(PARTICLE_COUNT, 3);
    let before = field.velocities().to_vec();
    let mut clock = SimulationClock::new();
    for _ in 0..500 {
        clock.advance(Duration::from_millis(16));
        field.update(&clock);
    }
    assert_eq!(field.velocities(), &before[..]);
}

#[test]
fn motion_is_velocity_plus_wave() {
    let mut field = ParticleField::new(PARTICLE_COUNT, 11);
    let mut clock = SimulationClock::new();
    clock.advance(Duration::from_millis(250));
    let before = field.positions().to_vec();
    field.update(&clock);
    let t = clock.elapsed_secs();
    let inner = PARTICLE_BOUND_XY - 1.0;
    for i in 0..field.len() {
        let y0 = before[i * 3 + 1];
        if y0.abs() > inner {
            continue;
        }
        let vy = field.velocities()[i * 3 + 1];
        let wave = (t + i as f32 * WAVE_INDEX_STEP).sin() * WAVE_AMPLITUDE;
        let y1 = field.position(i).y;
        assert!((y1 - (y0 + vy + wave)).abs() < 1e-4, "particle {i}");
    }
}

#[test]
fn shimmer_touches_only_the_current_slot() {
    let mut field = ParticleField::new(PARTICLE_COUNT, 5);
    let mut clock = SimulationClock::new();
    clock.advance(Duration::from_millis(730));
    let slot = (clock.elapsed_secs() * SHIMMER_RATE).floor() as usize % SHIMMER_WINDOW;
    let before = field.colors().to_vec();
    field.update(&clock);
    let mut changed = 0;
    for i in 0..field.len() {
        if field.colors()[i * 3..i * 3 + 3] != before[i * 3..i * 3 + 3] {
            assert_eq!(i % SHIMMER_WINDOW, slot, "particle {i} outside slot {slot}");
            changed += 1;
        }
    }
    assert!(changed > 0);
    assert!(changed <= PARTICLE_COUNT / SHIMMER_WINDOW);
}

#[test]
fn hsl_primaries() {
    let close = |a: [f32; 3], b: [f32; 3]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5);
    assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
    assert!(close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
    assert!(close(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
    assert!(close(hsl_to_rgb(0.3, 0.0, 0.25), [0.25, 0.25, 0.25]));
}
