/// One simulated hour per rendered frame.
pub const DAY_STEP: f32 = 1.0 / 24.0;

const MIN_WARP: f32 = 1.0 / 16.0;
const MAX_WARP: f32 = 64.0;

/// Simulated day counter, advanced once per frame after the bodies are drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimClock {
    day: f32,
    warp: f32,
    paused: bool,
}

impl SimClock {
    pub fn new(warp: f32) -> Self {
        let warp = if warp.is_finite() && warp > 0.0 { warp } else { 1.0 };
        Self {
            day: 0.0,
            warp: warp.clamp(MIN_WARP, MAX_WARP),
            paused: false,
        }
    }

    pub fn day(&self) -> f32 {
        self.day
    }

    pub fn warp(&self) -> f32 {
        self.warp
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn advance(&mut self) {
        if !self.paused {
            self.day += DAY_STEP * self.warp;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn faster(&mut self) {
        self.warp = (self.warp * 2.0).min(MAX_WARP);
    }

    pub fn slower(&mut self) {
        self.warp = (self.warp * 0.5).max(MIN_WARP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_four_frames_make_a_day() {
        let mut clock = SimClock::new(1.0);
        for _ in 0..24 {
            clock.advance();
        }
        assert!((clock.day() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn paused_clock_holds_still() {
        let mut clock = SimClock::new(1.0);
        clock.advance();
        clock.toggle_pause();
        clock.advance();
        assert_eq!(clock.day(), DAY_STEP);
        assert!(clock.paused());
    }

    #[test]
    fn warp_scales_the_step_and_is_bounded() {
        let mut clock = SimClock::new(4.0);
        clock.advance();
        assert_eq!(clock.day(), DAY_STEP * 4.0);
        for _ in 0..20 {
            clock.faster();
        }
        assert_eq!(clock.warp(), MAX_WARP);
        for _ in 0..20 {
            clock.slower();
        }
        assert_eq!(clock.warp(), MIN_WARP);
        assert_eq!(SimClock::new(0.0).warp(), 1.0);
        assert_eq!(SimClock::new(f32::NAN).warp(), 1.0);
    }
}
