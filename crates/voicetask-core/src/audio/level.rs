//! Input level metering.

/// Range of the meter in decibels below full scale.
const METER_FLOOR_DB: f32 = 60.0;

/// Map a peak sample magnitude (`0.0..=1.0` of full scale) to a meter level.
///
/// The peak is converted to dBFS and the range `-60 dB..=0 dB` is mapped
/// linearly onto `0.0..=1.0`. Silence, NaN and out-of-range input clamp to the
/// ends of the meter.
pub fn normalize_level(peak: f32) -> f32 {
    if !peak.is_finite() {
        return 0.0;
    }
    let db = 20.0 * (peak.abs() + 1e-6).log10();
    ((db + METER_FLOOR_DB) / METER_FLOOR_DB).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_zero() {
        assert_eq!(normalize_level(0.0), 0.0);
    }

    #[test]
    fn test_full_scale_is_one() {
        assert!((normalize_level(1.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_minus_thirty_db_is_half() {
        // 10^(-30/20) ≈ 0.0316
        let level = normalize_level(0.031_622_8);
        assert!((level - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_invalid_input_is_clamped() {
        assert_eq!(normalize_level(f32::NAN), 0.0);
        assert_eq!(normalize_level(4.0), 1.0);
    }
}
