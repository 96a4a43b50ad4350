//! Martian calendar used to index the hourly simulation.
//!
//! The simulation steps in whole hours. A sol is 24.6 hours long, but the
//! plant schedules by truncated 24-step days, so a Martian year of 687 days
//! is 687 * 24 steps.

use std::f64::consts::TAU;

/// Length of a sol in Earth hours.
pub const SOL_HOURS: f64 = 24.6;
/// Length of a Martian year in days.
pub const YEAR_DAYS: u64 = 687;
/// Whole hourly steps scheduled per day.
pub const STEPS_PER_DAY: u64 = SOL_HOURS as u64;
/// Whole hourly steps in one Martian year.
pub const STEPS_PER_YEAR: u64 = YEAR_DAYS * STEPS_PER_DAY;

/// Number of hourly steps covering `years` Martian years (truncated).
///
/// Non-positive or non-finite durations give zero steps.
pub fn total_time_steps(years: f64) -> usize {
    if !years.is_finite() || years <= 0.0 {
        return 0;
    }
    (STEPS_PER_YEAR as f64 * years) as usize
}

/// Sol number (fractional) of an hour index.
pub fn sol_of(hour: usize) -> f64 {
    hour as f64 / SOL_HOURS
}

/// Hour within the 24-step scheduling day.
pub fn hour_of_day(hour: usize) -> u64 {
    hour as u64 % STEPS_PER_DAY
}

/// Seasonal insolation modifier in `[0, 1]`, peaking at the start of each year.
pub fn seasonal_modifier(hour: usize) -> f64 {
    let year_hours = STEPS_PER_YEAR;
    let phase = (hour as u64 % year_hours) as f64 / year_hours as f64;
    0.5 * (1.0 + (TAU * phase).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenth_of_a_year_is_1648_steps() {
        assert_eq!(STEPS_PER_YEAR, 16_488);
        assert_eq!(total_time_steps(0.1), 1648);
        assert_eq!(total_time_steps(0.0), 0);
        assert_eq!(total_time_steps(-1.0), 0);
        assert_eq!(total_time_steps(f64::NAN), 0);
    }

    #[test]
    fn sol_uses_true_sol_length() {
        assert!((sol_of(246) - 10.0).abs() < 1e-12);
        assert_eq!(sol_of(0), 0.0);
    }

    #[test]
    fn seasonal_modifier_spans_unit_interval() {
        assert!((seasonal_modifier(0) - 1.0).abs() < 1e-12);
        let mid = (STEPS_PER_YEAR / 2) as usize;
        assert!(seasonal_modifier(mid).abs() < 1e-9);
        for h in (0..STEPS_PER_YEAR as usize * 2).step_by(97) {
            let m = seasonal_modifier(h);
            assert!((0.0..=1.0).contains(&m));
        }
    }
}
