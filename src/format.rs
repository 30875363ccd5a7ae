//! Human-readable distance and duration strings.
//!
//! Shared by the trip totals and the per-leg annotations so both always read
//! the same way.

/// Distance shown for the first stop of a trip.
pub const ZERO_DISTANCE: &str = "0 km";

/// Duration shown for the first stop of a trip.
pub const ZERO_DURATION: &str = "0 min";

/// Formats meters as kilometers with one decimal, e.g. `"1200.0 km"`.
pub fn format_distance(meters: f64) -> String {
    format!("{:.1} km", clamp_non_negative(meters) / 1000.0)
}

/// Formats seconds as `"{h}h {m}m"` from one hour up, else `"{m} min"`.
///
/// Hours and minutes are truncated, never rounded up.
pub fn format_duration(seconds: f64) -> String {
    let total = clamp_non_negative(seconds).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{} min", minutes)
    }
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_one_decimal() {
        assert_eq!(format_distance(1_200_000.0), "1200.0 km");
        assert_eq!(format_distance(400_000.0), "400.0 km");
        assert_eq!(format_distance(12_345.0), "12.3 km");
        assert_eq!(format_distance(0.0), "0.0 km");
    }

    #[test]
    fn test_duration_hours_and_minutes() {
        assert_eq!(format_duration(10_800.0), "3h 0m");
        assert_eq!(format_duration(3_600.0), "1h 0m");
        assert_eq!(format_duration(5_430.0), "1h 30m");
    }

    #[test]
    fn test_duration_under_an_hour() {
        assert_eq!(format_duration(3_599.0), "59 min");
        assert_eq!(format_duration(59.0), "0 min");
        assert_eq!(format_duration(0.0), "0 min");
    }

    #[test]
    fn test_garbage_input_formats_as_zero() {
        assert_eq!(format_distance(-5.0), "0.0 km");
        assert_eq!(format_duration(f64::NAN), "0 min");
    }
}
