use std::time::Duration;

/// Explicit simulation time threaded through every subsystem update.
///
/// The clock is advanced once per tick by the session and then only read, so
/// all subsystems observe the same `elapsed` value within a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationClock {
    elapsed: Duration,
    delta: Duration,
    frame: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at an arbitrary point in time; the figure pose and the particle
    /// wave depend only on elapsed time, so this is enough to resume a scene.
    pub fn starting_at(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.delta = dt;
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    #[inline]
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
