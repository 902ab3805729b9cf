/// Time sources and the wall-clock blink oscillator
use std::time::{SystemTime, UNIX_EPOCH};

use crate::render::Color;

/// Beacon alternation rate, phases per millisecond
pub const BEACON_FREQUENCY: f64 = 0.005;
/// Blinker alternation rate, phases per millisecond
pub const BLINKER_FREQUENCY: f64 = 0.001;

pub const BEACON_COLORS: [Color; 2] = [Color::WHITE, Color::BLUE];
pub const BLINKER_COLORS: [Color; 2] = [Color::WHITE, Color::AMBER];

/// Source of wall-clock time in milliseconds
pub trait Clock {
    fn now_millis(&self) -> f64;
}

/// Milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_millis(&self) -> f64 {
        self.0
    }
}

/// Pick one of two colors from the phase `floor(time * frequency)`.
/// Even phases show the second color, odd phases the first.
pub fn alternating_color(colors: [Color; 2], frequency: f64, time_ms: f64) -> Color {
    let phase = (time_ms * frequency).floor() as i64;
    if phase.rem_euclid(2) == 0 {
        colors[1]
    } else {
        colors[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blinker_period() {
        // One phase per second
        assert_eq!(alternating_color(BLINKER_COLORS, BLINKER_FREQUENCY, 0.0), Color::AMBER);
        assert_eq!(alternating_color(BLINKER_COLORS, BLINKER_FREQUENCY, 999.0), Color::AMBER);
        assert_eq!(alternating_color(BLINKER_COLORS, BLINKER_FREQUENCY, 1000.0), Color::WHITE);
        assert_eq!(alternating_color(BLINKER_COLORS, BLINKER_FREQUENCY, 2500.0), Color::AMBER);
    }

    #[test]
    fn test_beacon_is_faster() {
        assert_eq!(alternating_color(BEACON_COLORS, BEACON_FREQUENCY, 100.0), Color::BLUE);
        assert_eq!(alternating_color(BEACON_COLORS, BEACON_FREQUENCY, 200.0), Color::WHITE);
        assert_eq!(alternating_color(BEACON_COLORS, BEACON_FREQUENCY, 400.0), Color::BLUE);
    }

    #[test]
    fn test_pure_function_of_time() {
        let clock = FixedClock(1_700_000_123_456.0);
        let a = alternating_color(BLINKER_COLORS, BLINKER_FREQUENCY, clock.now_millis());
        let b = alternating_color(BLINKER_COLORS, BLINKER_FREQUENCY, clock.now_millis());
        assert_eq!(a, b);
    }

    #[test]
    fn test_system_clock_is_wall_clock() {
        // Later than 2020-01-01
        assert!(SystemClock.now_millis() > 1_577_836_800_000.0);
    }
}
