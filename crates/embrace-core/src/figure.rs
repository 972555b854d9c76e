//! Two articulated figures cycling through Embrace → HoldHands → HeartGesture.
//!
//! The pose is a pure function of `(phase, progress, elapsed)`; the only state
//! carried between frames is the `PhaseClock`. Everything that moves is
//! derived from that, which keeps the animation restartable from any time and
//! testable without a graphics context.

use crate::clock::SimulationClock;
use crate::constants::*;
use crate::heart::HeartPose;
use crate::mesh::Pivot;
use glam::{Mat4, Quat, Vec3};
use std::f32::consts::PI;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    Embrace,
    HoldHands,
    HeartGesture,
}

impl AnimationPhase {
    pub const ALL: [AnimationPhase; 3] = [
        AnimationPhase::Embrace,
        AnimationPhase::HoldHands,
        AnimationPhase::HeartGesture,
    ];

    pub fn index(self) -> usize {
        match self {
            AnimationPhase::Embrace => 0,
            AnimationPhase::HoldHands => 1,
            AnimationPhase::HeartGesture => 2,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Round-robin successor; the cycle has no terminal state.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn duration(self) -> Duration {
        PHASE_DURATION
    }
}

/// Phase index plus the time spent inside the current phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseClock {
    phase: AnimationPhase,
    timer: Duration,
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::starting_in(AnimationPhase::Embrace)
    }
}

impl PhaseClock {
    pub fn starting_in(phase: AnimationPhase) -> Self {
        Self {
            phase,
            timer: Duration::ZERO,
        }
    }

    /// Clock positioned `elapsed` after the start of an Embrace phase.
    pub fn at(elapsed: Duration) -> Self {
        let mut clock = Self::default();
        clock.advance(elapsed);
        clock
    }

    /// Accumulate `dt`. Each time the timer reaches the phase duration it
    /// rolls over and the phase advances; a long `dt` may cross several
    /// boundaries and keeps only the remainder. Constant time in `dt`.
    pub fn advance(&mut self, dt: Duration) {
        let period = PHASE_DURATION.as_nanos();
        let total = self.timer.saturating_add(dt).as_nanos();
        let rolled = total / period;
        // remainder < period, which fits in u64
        self.timer = Duration::from_nanos((total % period) as u64);
        let steps = (rolled % AnimationPhase::ALL.len() as u128) as usize;
        self.phase = AnimationPhase::from_index(self.phase.index() + steps);
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn timer(&self) -> Duration {
        self.timer
    }

    /// `timer / duration`, always in `[0, 1)`.
    pub fn progress(&self) -> f32 {
        let ratio = self.timer.as_secs_f64() / self.phase.duration().as_secs_f64();
        (ratio as f32).min(1.0 - f32::EPSILON)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FigureId {
    Left,
    Right,
}

impl FigureId {
    pub const ALL: [FigureId; 2] = [FigureId::Left, FigureId::Right];

    pub fn index(self) -> usize {
        match self {
            FigureId::Left => 0,
            FigureId::Right => 1,
        }
    }

    /// +1 when the partner stands toward +X, -1 otherwise.
    pub fn inward(self) -> f32 {
        match self {
            FigureId::Left => 1.0,
            FigureId::Right => -1.0,
        }
    }

    /// Static base offset; point lights are anchored here.
    pub fn base_offset(self) -> Vec3 {
        Vec3::new(-self.inward() * FIGURE_BASE_X, 0.0, 0.0)
    }

    pub fn color(self) -> [f32; 3] {
        FIGURE_COLORS[self.index()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FigurePart {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftHand,
    RightHand,
}

/// Primitive used to render a part. Geometry is built from this once per
/// session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PartShape {
    Sphere {
        radius: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        pivot: Pivot,
    },
}

impl FigurePart {
    pub const ALL: [FigurePart; 6] = [
        FigurePart::Head,
        FigurePart::Torso,
        FigurePart::LeftArm,
        FigurePart::RightArm,
        FigurePart::LeftHand,
        FigurePart::RightHand,
    ];

    pub fn index(self) -> usize {
        match self {
            FigurePart::Head => 0,
            FigurePart::Torso => 1,
            FigurePart::LeftArm => 2,
            FigurePart::RightArm => 3,
            FigurePart::LeftHand => 4,
            FigurePart::RightHand => 5,
        }
    }

    pub fn shape(self) -> PartShape {
        match self {
            FigurePart::Head => PartShape::Sphere {
                radius: HEAD_RADIUS,
            },
            FigurePart::Torso => PartShape::Cylinder {
                radius_top: TORSO_RADIUS_TOP,
                radius_bottom: TORSO_RADIUS_BOTTOM,
                height: TORSO_HEIGHT,
                pivot: Pivot::Center,
            },
            FigurePart::LeftArm | FigurePart::RightArm => PartShape::Cylinder {
                radius_top: ARM_RADIUS,
                radius_bottom: ARM_RADIUS * 0.8,
                height: ARM_LENGTH,
                pivot: Pivot::Top,
            },
            FigurePart::LeftHand | FigurePart::RightHand => PartShape::Sphere {
                radius: HAND_RADIUS,
            },
        }
    }
}

/// Local transform of one rigid part relative to its figure root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl PartTransform {
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FigurePose {
    pub root: Vec3,
    pub breathing: f32,
    pub parts: [PartTransform; 6],
}

impl FigurePose {
    pub fn part(&self, part: FigurePart) -> &PartTransform {
        &self.parts[part.index()]
    }

    pub fn root_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.root) * Mat4::from_scale(Vec3::splat(self.breathing))
    }

    pub fn world_matrix(&self, part: FigurePart) -> Mat4 {
        self.root_matrix() * self.part(part).to_mat4()
    }

    pub fn world_position(&self, part: FigurePart) -> Vec3 {
        self.root_matrix()
            .transform_point3(self.part(part).translation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePose {
    pub phase: AnimationPhase,
    pub progress: f32,
    pub figures: [FigurePose; 2],
    pub heart: HeartPose,
}

impl ScenePose {
    pub fn figure(&self, id: FigureId) -> &FigurePose {
        &self.figures[id.index()]
    }
}

/// Phase-level targets shared by both figures; mirrored per figure.
struct Stance {
    base_x: f32,
    inner_arm: f32,
    outer_arm: f32,
}

fn stance(phase: AnimationPhase, progress: f32) -> Stance {
    let arc = (progress * PI).sin().max(0.0);
    match phase {
        AnimationPhase::Embrace => Stance {
            base_x: FIGURE_BASE_X - EMBRACE_CLOSE_IN * arc,
            inner_arm: EMBRACE_ARM_ANGLE * arc,
            outer_arm: 0.0,
        },
        AnimationPhase::HoldHands => {
            let settle = smoothstep(0.0, ARM_RAISE_FRACTION, progress);
            Stance {
                base_x: lerp(FIGURE_BASE_X, HOLD_HANDS_BASE_X, settle),
                inner_arm: HOLD_HANDS_ARM_ANGLE * settle,
                outer_arm: 0.0,
            }
        }
        AnimationPhase::HeartGesture => {
            let raise = smoothstep(0.0, ARM_RAISE_FRACTION, progress);
            let lower = smoothstep(1.0 - ARM_RAISE_FRACTION, 1.0, progress);
            let spread = lerp(HOLD_HANDS_BASE_X, HEART_GESTURE_BASE_X, raise);
            Stance {
                base_x: lerp(spread, FIGURE_BASE_X, lower),
                inner_arm: lerp(HOLD_HANDS_ARM_ANGLE, HEART_GESTURE_INNER_ANGLE, raise)
                    * (1.0 - lower),
                outer_arm: HEART_GESTURE_OUTER_ANGLE * raise * (1.0 - lower),
            }
        }
    }
}

/// Arm hanging from the shoulder on side `side` (+1 = +X), raised by
/// `angle` radians away from the body along that side. Returns the arm and
/// the hand at its tip.
fn arm(side: f32, angle: f32) -> (PartTransform, PartTransform) {
    let shoulder = Vec3::new(side * SHOULDER_X, SHOULDER_Y, 0.0);
    let rotation = Quat::from_rotation_z(side * angle);
    let tip = shoulder + rotation * Vec3::new(0.0, -ARM_LENGTH, 0.0);
    (
        PartTransform {
            translation: shoulder,
            rotation,
            scale: Vec3::ONE,
        },
        PartTransform::at(tip),
    )
}

fn figure_pose(id: FigureId, stance: &Stance, elapsed: f32) -> FigurePose {
    let inward = id.inward();
    let breathing = 1.0 + BREATH_AMPLITUDE * (elapsed * BREATH_RATE).sin();
    let head_turn =
        HEAD_TURN_AMPLITUDE * (elapsed * HEAD_TURN_RATE + id.index() as f32 * PI).sin();

    let (inner_arm, inner_hand) = arm(inward, stance.inner_arm);
    let (outer_arm, outer_hand) = arm(-inward, stance.outer_arm);
    // The +X side arm is the right arm.
    let (right_arm, right_hand, left_arm, left_hand) = if inward > 0.0 {
        (inner_arm, inner_hand, outer_arm, outer_hand)
    } else {
        (outer_arm, outer_hand, inner_arm, inner_hand)
    };

    let mut head = PartTransform::at(Vec3::new(0.0, HEAD_Y, 0.0));
    head.rotation = Quat::from_rotation_y(head_turn);

    FigurePose {
        root: Vec3::new(-inward * stance.base_x, 0.0, 0.0),
        breathing,
        parts: [
            head,
            PartTransform::at(Vec3::new(0.0, TORSO_Y, 0.0)),
            left_arm,
            right_arm,
            left_hand,
            right_hand,
        ],
    }
}

fn heart_pose(phase: AnimationPhase, progress: f32, elapsed: f32) -> HeartPose {
    match phase {
        AnimationPhase::HeartGesture => HeartPose {
            translation: HEART_POSITION,
            scale: HEART_MAX_SCALE * (progress * PI).sin().max(0.0),
            spin: elapsed * HEART_SPIN_RATE,
        },
        AnimationPhase::Embrace | AnimationPhase::HoldHands => HeartPose::hidden(HEART_POSITION),
    }
}

/// Pure pose function: same inputs, same transforms.
pub fn pose(phase: AnimationPhase, progress: f32, elapsed: f32) -> ScenePose {
    let progress = progress.clamp(0.0, 1.0);
    let stance = stance(phase, progress);
    ScenePose {
        phase,
        progress,
        figures: [
            figure_pose(FigureId::Left, &stance, elapsed),
            figure_pose(FigureId::Right, &stance, elapsed),
        ],
        heart: heart_pose(phase, progress, elapsed),
    }
}

/// Derives the phase clock from the simulation clock's elapsed time and
/// evaluates the pose. `origin` is where the cycle stood at elapsed zero.
pub struct FigureAnimator {
    origin: PhaseClock,
    phase_clock: PhaseClock,
    current: ScenePose,
}

impl Default for FigureAnimator {
    fn default() -> Self {
        Self::new(PhaseClock::default())
    }
}

impl FigureAnimator {
    pub fn new(phase_clock: PhaseClock) -> Self {
        Self {
            origin: phase_clock,
            phase_clock,
            current: pose(phase_clock.phase(), phase_clock.progress(), 0.0),
        }
    }

    pub fn update(&mut self, clock: &SimulationClock) -> &ScenePose {
        let mut phase_clock = self.origin;
        phase_clock.advance(clock.elapsed());
        if phase_clock.phase() != self.phase_clock.phase() {
            log::debug!("[figures] phase -> {:?}", phase_clock.phase());
        }
        self.phase_clock = phase_clock;
        self.current = pose(
            self.phase_clock.phase(),
            self.phase_clock.progress(),
            clock.elapsed_secs(),
        );
        &self.current
    }

    pub fn phase_clock(&self) -> &PhaseClock {
        &self.phase_clock
    }

    pub fn current(&self) -> &ScenePose {
        &self.current
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
