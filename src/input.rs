/// Reads one raw form value as a number. Empty, blank, non-numeric and
/// non-finite text all count as zero; negative values are kept as typed.
pub fn coerce(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Sums a category's raw fields in form order. A sum that overflows counts
/// as zero, the same as any other unusable input.
pub fn sum_fields<S: AsRef<str>>(fields: &[S]) -> f64 {
    finite_or_zero(fields.iter().map(|field| coerce(field.as_ref())).sum())
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_text_counts_as_zero() {
        for raw in ["", "   ", "abc", "12abc", "1,000", "NaN", "inf", "-infinity", "--3"] {
            assert_eq!(coerce(raw), 0.0, "{raw:?}");
        }
    }

    #[test]
    fn numeric_text_passes_through() {
        assert_eq!(coerce("250"), 250.0);
        assert_eq!(coerce(" 12.5 "), 12.5);
        assert_eq!(coerce("-40"), -40.0);
        assert_eq!(coerce("1e3"), 1000.0);
    }

    #[test]
    fn sum_skips_malformed_fields() {
        assert_eq!(sum_fields(&["100", "", "oops", "-25", "0.5"]), 75.5);
        assert_eq!(sum_fields::<&str>(&[]), 0.0);
    }

    #[test]
    fn overflowing_sum_counts_as_zero() {
        assert_eq!(sum_fields(&["1e308", "1e308"]), 0.0);
        assert_eq!(sum_fields(&["-1e308", "-1e308", "5"]), 0.0);
        assert_eq!(sum_fields(&["1e308", "-1e308", "5"]), 5.0);
    }
}
