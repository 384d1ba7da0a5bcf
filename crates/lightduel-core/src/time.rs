use serde::{Deserialize, Serialize};

/// Simulation clock shared by every component of a match.
///
/// Pausing freezes simulated time only; real time keeps flowing so that
/// one-shot timers (round reload delays) still fire while play is frozen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimClock {
    paused: bool,
    sim_elapsed: f32,
    real_elapsed: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `dt` real seconds. Returns the simulated delta
    /// (zero while paused).
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = dt.max(0.0);
        self.real_elapsed += dt;
        if self.paused {
            return 0.0;
        }
        self.sim_elapsed += dt;
        dt
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Simulated seconds since the clock was created.
    pub fn sim_elapsed(&self) -> f32 {
        self.sim_elapsed
    }

    /// Real seconds since the clock was created, including paused time.
    pub fn real_elapsed(&self) -> f32 {
        self.real_elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_clock_only_advances_real_time() {
        let mut clock = SimClock::new();
        assert_eq!(clock.advance(0.5), 0.5);
        clock.pause();
        assert_eq!(clock.advance(0.5), 0.0);
        assert!((clock.sim_elapsed() - 0.5).abs() < f32::EPSILON);
        assert!((clock.real_elapsed() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn double_pause_single_resume() {
        let mut clock = SimClock::new();
        clock.pause();
        clock.pause();
        clock.resume();
        assert!(!clock.is_paused());
        assert_eq!(clock.advance(0.1), 0.1);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut clock = SimClock::new();
        assert_eq!(clock.advance(-1.0), 0.0);
        assert_eq!(clock.real_elapsed(), 0.0);
    }
}
