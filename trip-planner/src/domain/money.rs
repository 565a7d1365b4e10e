//! Price arithmetic.

/// Round a price to 2 decimal places.
pub fn round_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Median of a set of prices, or `None` if there are none.
///
/// For an even count this is the mean of the two middle values.
pub fn median(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }

    let mut sorted = prices.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_cents_values() {
        assert_eq!(round_cents(1790.0), 1790.0);
        assert_eq!(round_cents(123.456), 123.46);
        assert_eq!(round_cents(123.454), 123.45);
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[5.0]), Some(5.0));
        assert_eq!(median(&[300.0, 100.0, 200.0]), Some(200.0));
        assert_eq!(median(&[400.0, 100.0, 200.0, 300.0]), Some(250.0));
    }

    #[test]
    fn median_keeps_duplicates() {
        assert_eq!(median(&[100.0, 100.0, 900.0]), Some(100.0));
    }
}
