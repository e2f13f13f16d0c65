//! Locale-invariant numeric formatting for the stats display.

/// The number of bytes in a megabyte.
pub const BYTES_IN_MEGABYTE: u64 = 1_048_576;

/// Format a floating metric with 2 fractional digits, rounding half-up
/// (away from zero), with a `.` decimal separator regardless of locale.
///
/// Non-finite inputs render as `0.00`; they only arise from degenerate
/// timer deltas and must not corrupt the display.
#[must_use]
pub fn format_metric(value: f64) -> String {
    if !value.is_finite() {
        return String::from("0.00");
    }
    let scaled = value * 100.0;
    let rounded = if scaled < 0.0 {
        (scaled - 0.5).ceil()
    } else {
        (scaled + 0.5).floor()
    };
    format!("{:.2}", rounded / 100.0)
}

/// Convert a byte count to whole megabytes. Integer division, no rounding.
#[must_use]
pub const fn bytes_to_megabytes(bytes: u64) -> u64 {
    bytes / BYTES_IN_MEGABYTE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        assert_eq!(format_metric(20.0), "20.00");
        assert_eq!(format_metric(0.005), "0.01");
        assert_eq!(format_metric(0.004), "0.00");
        assert_eq!(format_metric(1.2349), "1.23");
        assert_eq!(format_metric(1.235), "1.24");
        assert_eq!(format_metric(-0.005), "-0.01");
    }

    #[test]
    fn non_finite_renders_as_zero() {
        assert_eq!(format_metric(f64::NAN), "0.00");
        assert_eq!(format_metric(f64::INFINITY), "0.00");
    }

    #[test]
    fn megabyte_conversion_truncates() {
        assert_eq!(bytes_to_megabytes(10_485_760), 10);
        assert_eq!(bytes_to_megabytes(10_485_759), 9);
        assert_eq!(bytes_to_megabytes(0), 0);
    }
}
