use glam::Vec3;
use std::time::Duration;

// Shared simulation and scene tuning constants. Everything here is compiled in;
// the host only chooses the container.

// Particle field
pub const PARTICLE_COUNT: usize = 800;
pub const PARTICLE_BOUND_XY: f32 = 100.0;
pub const PARTICLE_BOUND_Z: f32 = 50.0;
pub const PARTICLE_SPEED: f32 = 0.01; // max |velocity| per axis, units per frame
pub const PARTICLE_SIZE_MIN: f32 = 0.4;
pub const PARTICLE_SIZE_MAX: f32 = 1.6;
pub const PARTICLE_SEED: u64 = 0x00E3_B7AC_E5EE_D001;

// Vertical wave drift layered on the linear motion
pub const WAVE_AMPLITUDE: f32 = 0.01;
pub const WAVE_INDEX_STEP: f32 = 0.1;

// Shimmer: only one particle in SHIMMER_WINDOW gets a new color per frame
pub const SHIMMER_WINDOW: usize = 10;
pub const SHIMMER_RATE: f32 = 10.0; // subset rotations per second

// Ember palette (HSL)
pub const EMBER_HUE_MIN: f32 = 0.88;
pub const EMBER_HUE_SPAN: f32 = 0.16; // wraps past 1.0 into warm oranges
pub const EMBER_SATURATION: f32 = 0.8;
pub const EMBER_LIGHTNESS: f32 = 0.6;
pub const SHIMMER_LIGHTNESS_SPAN: f32 = 0.2;

// Animation cycle
pub const PHASE_DURATION: Duration = Duration::from_secs(4);

// Figures
pub const FIGURE_BASE_X: f32 = 2.0;
pub const FIGURE_COLORS: [[f32; 3]; 2] = [
    [1.0, 0.42, 0.62], // rose
    [0.42, 0.62, 1.0], // sky
];
pub const HEAD_RADIUS: f32 = 0.42;
pub const TORSO_RADIUS_TOP: f32 = 0.42;
pub const TORSO_RADIUS_BOTTOM: f32 = 0.3;
pub const TORSO_HEIGHT: f32 = 1.5;
pub const ARM_RADIUS: f32 = 0.1;
pub const ARM_LENGTH: f32 = 1.0;
pub const HAND_RADIUS: f32 = 0.14;
pub const HEAD_Y: f32 = 2.3;
pub const TORSO_Y: f32 = 1.05;
pub const SHOULDER_X: f32 = 0.55;
pub const SHOULDER_Y: f32 = 1.7;

// Pose targets
pub const EMBRACE_CLOSE_IN: f32 = 1.35; // how far each figure slides inward at the peak
pub const EMBRACE_ARM_ANGLE: f32 = 1.45;
pub const HOLD_HANDS_BASE_X: f32 = 1.3;
pub const HOLD_HANDS_ARM_ANGLE: f32 = std::f32::consts::FRAC_PI_4;
pub const HEART_GESTURE_BASE_X: f32 = 2.5;
pub const HEART_GESTURE_INNER_ANGLE: f32 = 2.35;
pub const HEART_GESTURE_OUTER_ANGLE: f32 = 2.75;
pub const ARM_RAISE_FRACTION: f32 = 0.25; // share of the phase spent raising arms

// Secondary motion
pub const BREATH_AMPLITUDE: f32 = 0.02;
pub const BREATH_RATE: f32 = 2.0;
pub const HEAD_TURN_AMPLITUDE: f32 = 0.3;
pub const HEAD_TURN_RATE: f32 = 0.8;

// Heart glyph
pub const HEART_SIZE: f32 = 1.6;
pub const HEART_DEPTH: f32 = 0.2;
pub const HEART_TOLERANCE: f32 = 0.25; // in outline units before scaling
pub const HEART_MAX_SCALE: f32 = 1.0;
pub const HEART_SPIN_RATE: f32 = 1.5; // radians per second
pub const HEART_POSITION: Vec3 = Vec3::new(0.0, 4.0, 0.0);
pub const HEART_COLOR: [f32; 3] = [1.0, 0.18, 0.36];

// Lights
pub const AMBIENT_COLOR: [f32; 3] = [0.25, 0.2, 0.3];
pub const AMBIENT_INTENSITY: f32 = 0.5;
pub const AMBIENT_AMPLITUDE: f32 = 0.05;
pub const KEY_LIGHT_INTENSITY: f32 = 1.2;
pub const KEY_LIGHT_AMPLITUDE: f32 = 0.35;
pub const KEY_LIGHT_RANGE: f32 = 12.0;
pub const KEY_LIGHT_OFFSET: Vec3 = Vec3::new(0.0, 2.5, 1.5);
pub const SPOT_POSITION: Vec3 = Vec3::new(0.0, 10.0, 2.0);
pub const SPOT_INTENSITY: f32 = 1.0;
pub const SPOT_AMPLITUDE: f32 = 0.3;
pub const SPOT_RATE: f32 = 0.5;
pub const SPOT_ANGLE: f32 = std::f32::consts::FRAC_PI_6;
pub const SPOT_PENUMBRA: f32 = 0.3;
pub const SPOT_COLOR: [f32; 3] = [1.0, 0.92, 0.85];
pub const MOON_DIRECTION: Vec3 = Vec3::new(-0.4, -1.0, -0.6);
pub const MOON_COLOR: [f32; 3] = [0.62, 0.7, 1.0];
pub const MOON_INTENSITY: f32 = 0.4;
pub const MOON_AMPLITUDE: f32 = 0.08;
pub const MOON_RATE: f32 = 0.3;

// Atmosphere
pub const FOG_COLOR: [f32; 3] = [0.04, 0.02, 0.07];
pub const FOG_DENSITY: f32 = 0.02;

// Camera framing (fixed, never auto-fit)
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 2.0, 10.0);
pub const CAMERA_FOCAL_POINT: Vec3 = Vec3::new(0.0, 1.8, 0.0);
pub const CAMERA_FOVY_DEG: f32 = 60.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 500.0;
