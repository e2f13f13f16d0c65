//! Unit tests for numeric display formatting.

use raywatch::util::{bytes_to_megabytes, format_metric};

#[test]
fn two_decimals_half_up() {
    assert_eq!(format_metric(20.0), "20.00");
    assert_eq!(format_metric(0.125), "0.13");
    assert_eq!(format_metric(7.994), "7.99");
    assert_eq!(format_metric(7.995), "8.00");
}

#[test]
fn decimal_separator_is_locale_invariant() {
    // Always a dot, never a comma, whatever the host locale says.
    let rendered = format_metric(1234.5);
    assert_eq!(rendered, "1234.50");
    assert!(!rendered.contains(','));
}

#[test]
fn ten_mebibytes_display_as_10mb() {
    assert_eq!(bytes_to_megabytes(10_485_760), 10);
}

#[test]
fn partial_megabytes_truncate() {
    assert_eq!(bytes_to_megabytes(BYTES_JUST_UNDER_TWO_MB), 1);
}

const BYTES_JUST_UNDER_TWO_MB: u64 = 2 * 1_048_576 - 1;
