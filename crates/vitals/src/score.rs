//! Health score rule.

use crate::VitalReadings;

/// Upper bound of the health score.
pub const MAX_SCORE: u8 = 100;

const BASE_SCORE: u32 = 50;

/// Compute the 0-100 health score for a snapshot.
///
/// The rule is fixed; stored and displayed scores depend on it staying
/// stable across releases.
pub fn health_score(readings: &VitalReadings) -> u8 {
    let total = BASE_SCORE
        + heart_rate_points(readings.heart_rate)
        + blood_pressure_points(readings.systolic, readings.diastolic)
        + temperature_points(readings.body_temperature)
        + step_points(readings.step_count);
    total.min(u32::from(MAX_SCORE)) as u8
}

fn heart_rate_points(bpm: f64) -> u32 {
    if (60.0..=100.0).contains(&bpm) {
        15
    } else if (50.0..=110.0).contains(&bpm) {
        8
    } else {
        0
    }
}

fn blood_pressure_points(systolic: f64, diastolic: f64) -> u32 {
    if (90.0..=130.0).contains(&systolic) && (60.0..=85.0).contains(&diastolic) {
        15
    } else if (85.0..=140.0).contains(&systolic) {
        8
    } else {
        0
    }
}

fn temperature_points(celsius: f64) -> u32 {
    if (36.1..=37.2).contains(&celsius) {
        10
    } else if (35.5..=38.0).contains(&celsius) {
        5
    } else {
        0
    }
}

fn step_points(steps: u32) -> u32 {
    match steps {
        s if s > 8000 => 10,
        s if s > 5000 => 7,
        s if s > 2000 => 4,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(hr: f64, sys: f64, dia: f64, temp: f64, steps: u32) -> VitalReadings {
        VitalReadings {
            heart_rate: hr,
            body_temperature: temp,
            respiratory_rate: 16.0,
            systolic: sys,
            diastolic: dia,
            step_count: steps,
        }
    }

    #[test]
    fn test_ideal_readings_cap_at_100() {
        assert_eq!(health_score(&readings(72.0, 120.0, 80.0, 36.6, 9000)), 100);
    }

    #[test]
    fn test_all_out_of_range_is_base() {
        assert_eq!(health_score(&readings(45.0, 150.0, 95.0, 39.0, 500)), 50);
    }

    #[test]
    fn test_heart_rate_bands() {
        assert_eq!(heart_rate_points(60.0), 15);
        assert_eq!(heart_rate_points(100.0), 15);
        assert_eq!(heart_rate_points(50.0), 8);
        assert_eq!(heart_rate_points(110.0), 8);
        assert_eq!(heart_rate_points(49.9), 0);
        assert_eq!(heart_rate_points(110.1), 0);
    }

    #[test]
    fn test_blood_pressure_bands() {
        assert_eq!(blood_pressure_points(120.0, 80.0), 15);
        // Systolic fine but diastolic high drops to the partial band
        assert_eq!(blood_pressure_points(120.0, 90.0), 8);
        assert_eq!(blood_pressure_points(85.0, 50.0), 8);
        assert_eq!(blood_pressure_points(140.0, 95.0), 8);
        assert_eq!(blood_pressure_points(141.0, 80.0), 0);
        assert_eq!(blood_pressure_points(84.0, 70.0), 0);
    }

    #[test]
    fn test_temperature_bands() {
        assert_eq!(temperature_points(36.1), 10);
        assert_eq!(temperature_points(37.2), 10);
        assert_eq!(temperature_points(35.5), 5);
        assert_eq!(temperature_points(38.0), 5);
        assert_eq!(temperature_points(38.1), 0);
    }

    #[test]
    fn test_step_bands() {
        assert_eq!(step_points(8001), 10);
        assert_eq!(step_points(8000), 7);
        assert_eq!(step_points(5001), 7);
        assert_eq!(step_points(5000), 4);
        assert_eq!(step_points(2001), 4);
        assert_eq!(step_points(2000), 0);
    }

    #[test]
    fn test_partial_score() {
        // 50 + 8 (hr 105) + 15 + 5 (temp 37.8) + 4 (3000 steps)
        assert_eq!(health_score(&readings(105.0, 110.0, 70.0, 37.8, 3000)), 82);
    }
}
