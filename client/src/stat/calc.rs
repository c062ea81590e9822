//! Price-change and weighting arithmetic. Everything here is a pure function of
//! its inputs; callers recompute on every state change.

/// `(end / start) × 100 − 100`; `None` when the start is zero or not finite.
pub fn percentage_change(start: f64, end: f64) -> Option<f64> {
    if start == 0.0 || !start.is_finite() || !end.is_finite() {
        return None;
    }
    Some(end / start * 100.0 - 100.0)
}

/// Expenditure-share weighted average of the changes.
///
/// Each item is `(monthly spend, change)`. A missing change contributes
/// nothing, but its spend still counts towards the total. Zero total spend
/// yields `0.0`.
pub fn weighted_rate<I>(items: I) -> f64
where
    I: IntoIterator<Item = (f64, Option<f64>)>,
{
    let items: Vec<(f64, Option<f64>)> = items.into_iter().collect();
    let total: f64 = items.iter().map(|(spend, _)| spend).sum();
    if total == 0.0 {
        return 0.0;
    }
    items
        .iter()
        .map(|(spend, change)| spend / total * change.unwrap_or(0.0))
        .sum()
}

/// `part / total × 100`, or `0.0` when the total is zero.
pub fn share_percent(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn change_between_two_index_values() {
        assert!(close(percentage_change(100.0, 104.8).unwrap(), 4.8));
        assert!(close(percentage_change(200.0, 150.0).unwrap(), -25.0));
        assert_eq!(percentage_change(0.0, 104.8), None);
        assert_eq!(percentage_change(100.0, f64::NAN), None);
    }

    #[test]
    fn zero_spend_gives_zero_rate() {
        assert_eq!(weighted_rate(vec![(0.0, Some(10.0)), (0.0, Some(50.0))]), 0.0);
        assert_eq!(weighted_rate(Vec::<(f64, Option<f64>)>::new()), 0.0);
    }

    #[test]
    fn rate_is_share_weighted() {
        let rate = weighted_rate(vec![(600.0, Some(10.0)), (400.0, Some(0.0))]);
        assert!(close(rate, 6.0));
    }

    #[test]
    fn missing_change_still_dilutes_the_rate() {
        let rate = weighted_rate(vec![(500.0, Some(10.0)), (500.0, None)]);
        assert!(close(rate, 5.0));
    }

    #[test]
    fn share_of_zero_total_is_zero() {
        assert_eq!(share_percent(5.0, 0.0), 0.0);
        assert!(close(share_percent(25.0, 200.0), 12.5));
    }
}
