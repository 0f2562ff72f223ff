//! Wall-time source for the simulation
//!
//! The host advances the clock once per tick with the frame delta; every
//! timer in the simulation (bomb fuses, bullet TTLs, pickup expiry,
//! cooldowns) reads elapsed milliseconds from here. Tests drive it
//! directly to fast-forward past fuses.

/// Monotonic simulation clock, milliseconds since session start
#[derive(Debug, Clone, Default)]
pub struct Clock {
    now_ms: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in milliseconds
    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance by a tick delta in seconds
    pub fn advance(&mut self, dt_secs: f32) {
        self.now_ms += dt_secs as f64 * 1000.0;
    }

    /// Advance by milliseconds (test fast-forward)
    pub fn advance_ms(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    /// Milliseconds elapsed since an earlier timestamp
    #[inline]
    pub fn elapsed_since(&self, earlier_ms: f64) -> f64 {
        self.now_ms - earlier_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advance() {
        let mut clock = Clock::new();
        assert_eq!(clock.now_ms(), 0.0);

        clock.advance(1.0 / 60.0);
        assert!((clock.now_ms() - 16.666_667).abs() < 0.001);

        clock.advance_ms(3000.0);
        assert!(clock.elapsed_since(0.0) > 3000.0);
    }
}
