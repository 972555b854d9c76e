// Host-side tests for the light rig and fog.

use embrace_core::constants::*;
use embrace_core::*;
use std::time::Duration;

fn rig_at(secs: f32) -> LightRig {
    let mut rig = LightRig::new();
    let clock = SimulationClock::starting_at(Duration::from_secs_f32(secs));
    rig.update(&clock);
    rig
}

#[test]
fn each_figure_is_anchored_to_its_own_key_light() {
    let rig = LightRig::new();
    assert_eq!(rig.anchor_of(FigureId::Left), Some(LightId::KeyLeft));
    assert_eq!(rig.anchor_of(FigureId::Right), Some(LightId::KeyRight));
    for id in FigureId::ALL {
        let light = rig.anchored_light(id).expect("anchored");
        assert_eq!(light.position, id.base_offset() + KEY_LIGHT_OFFSET);
        assert_eq!(light.color, id.color());
    }
}

#[test]
fn key_lights_pulse_out_of_phase() {
    for t in [0.0_f32, 0.7, 1.9, 4.2] {
        let rig = rig_at(t);
        let left = rig.intensity(LightId::KeyLeft) - KEY_LIGHT_INTENSITY;
        let right = rig.intensity(LightId::KeyRight) - KEY_LIGHT_INTENSITY;
        assert!((left - KEY_LIGHT_AMPLITUDE * t.sin()).abs() < 1e-5);
        assert!((right - KEY_LIGHT_AMPLITUDE * t.cos()).abs() < 1e-5);
        // sin² + cos² = 1
        let norm = (left * left + right * right).sqrt();
        assert!((norm - KEY_LIGHT_AMPLITUDE).abs() < 1e-4);
    }
}

#[test]
fn intensities_stay_positive() {
    let mut rig = LightRig::new();
    let mut clock = SimulationClock::new();
    for _ in 0..2_000 {
        clock.advance(Duration::from_millis(33));
        rig.update(&clock);
        for id in [
            LightId::Ambient,
            LightId::KeyLeft,
            LightId::KeyRight,
            LightId::Spot,
            LightId::Moon,
        ] {
            assert!(rig.intensity(id) > 0.0, "{id:?}");
        }
    }
}

#[test]
fn update_never_moves_lights_or_fog() {
    let before = LightRig::new();
    let after = rig_at(17.3);
    for (a, b) in before.keys.iter().zip(after.keys.iter()) {
        assert_eq!(a.position, b.position);
    }
    assert_eq!(before.spot.position, after.spot.position);
    assert_eq!(before.moon.direction, after.moon.direction);
    assert_eq!(before.fog, after.fog);
}

#[test]
fn spot_aims_at_focal_point() {
    let rig = LightRig::new();
    let expected = (CAMERA_FOCAL_POINT - SPOT_POSITION).normalize();
    assert!(rig.spot.direction().distance(expected) < 1e-6);
}

#[test]
fn fog_thickens_with_distance() {
    let fog = LightRig::new().fog;
    assert_eq!(fog.factor(0.0), 0.0);
    let mut last = 0.0;
    for d in [1.0, 10.0, 50.0, 100.0, 400.0] {
        let f = fog.factor(d);
        assert!(f > last && f <= 1.0, "fog at {d}");
        last = f;
    }
    assert!(fog.factor(CAMERA_ZFAR) > 0.99);
}
