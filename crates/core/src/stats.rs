//! Placement summary arithmetic used by the batch dashboard.

/// Share of placed students as a percentage rounded to one decimal place.
///
/// Returns `0.0` for an empty batch.
pub fn placement_percentage(placed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let pct = placed as f64 * 100.0 / total as f64;
    (pct * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_is_zero_percent() {
        assert_eq!(placement_percentage(0, 0), 0.0);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(placement_percentage(1, 3), 33.3);
        assert_eq!(placement_percentage(2, 3), 66.7);
    }

    #[test]
    fn fully_placed_batch_is_hundred_percent() {
        assert_eq!(placement_percentage(40, 40), 100.0);
    }
}
