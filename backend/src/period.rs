use std::fmt;

/// A `(year, month)` point used by the range filters, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period {
    pub year: i32,
    pub month: i32,
}

impl Period {
    /// Parse `YYYY/MM`. Month must be 1-12; zero padding is optional.
    pub fn parse(s: &str) -> Option<Self> {
        let (y, m) = s.trim().split_once('/')?;
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if y.len() != 4 || !digits(y) || !digits(m) {
            return None;
        }
        let year: i32 = y.parse().ok()?;
        let month: i32 = m.parse().ok()?;
        (1..=12).contains(&month).then_some(Self { year, month })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

/// Inclusive `[from, to]` range with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    pub from: Period,
    pub to: Period,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("invalid period '{0}', expected YYYY/MM")]
    InvalidFormat(String),
    #[error("end period {to} is before start period {from}")]
    Reversed { from: Period, to: Period },
}

impl PeriodRange {
    /// Both bounds or neither: a lone `from` or `to` disables filtering.
    /// An empty value counts as absent.
    pub fn from_query(
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Option<Self>, RangeError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.trim().is_empty())
        }
        let (Some(from), Some(to)) = (present(from), present(to)) else {
            return Ok(None);
        };
        let start =
            Period::parse(from).ok_or_else(|| RangeError::InvalidFormat(from.to_string()))?;
        let end = Period::parse(to).ok_or_else(|| RangeError::InvalidFormat(to.to_string()))?;
        if end < start {
            return Err(RangeError::Reversed { from: start, to: end });
        }
        Ok(Some(Self { from: start, to: end }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded_months() {
        assert_eq!(Period::parse("2024/11"), Some(Period { year: 2024, month: 11 }));
        assert_eq!(Period::parse("2025/3"), Some(Period { year: 2025, month: 3 }));
        assert_eq!(Period::parse("2025/03").map(|p| p.to_string()).as_deref(), Some("2025/03"));
    }

    #[test]
    fn rejects_malformed_periods() {
        assert_eq!(Period::parse("2024-11"), None);
        assert_eq!(Period::parse("2024/13"), None);
        assert_eq!(Period::parse("2024/0"), None);
        assert_eq!(Period::parse("24/01"), None);
        assert_eq!(Period::parse("abcd/01"), None);
    }

    #[test]
    fn rejects_signed_parts() {
        assert_eq!(Period::parse("+024/01"), None);
        assert_eq!(Period::parse("2025/+3"), None);
        assert_eq!(Period::parse("2025/-1"), None);
        assert_eq!(Period::parse("2025/"), None);
    }

    #[test]
    fn range_errors_carry_readable_messages() {
        let err = PeriodRange::from_query(Some("2025-01"), Some("2025/02")).unwrap_err();
        assert_eq!(err.to_string(), "invalid period '2025-01', expected YYYY/MM");
        let err = PeriodRange::from_query(Some("2025/02"), Some("2025/01")).unwrap_err();
        assert_eq!(err.to_string(), "end period 2025/01 is before start period 2025/02");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn empty_bounds_disable_filtering() {
        assert_eq!(PeriodRange::from_query(Some(""), Some("")), Ok(None));
        assert_eq!(PeriodRange::from_query(Some("2024/01"), Some(" ")), Ok(None));
    }

    #[test]
    fn range_requires_both_bounds() {
        assert_eq!(PeriodRange::from_query(Some("2024/01"), None), Ok(None));
        assert_eq!(PeriodRange::from_query(None, Some("2024/01")), Ok(None));
        let range = PeriodRange::from_query(Some("2024/11"), Some("2025/11"))
            .unwrap()
            .unwrap();
        assert_eq!(range.from, Period { year: 2024, month: 11 });
        assert_eq!(range.to, Period { year: 2025, month: 11 });
    }

    #[test]
    fn range_rejects_reversed_bounds() {
        let err = PeriodRange::from_query(Some("2025/02"), Some("2025/01")).unwrap_err();
        assert!(matches!(err, RangeError::Reversed { .. }));
        // same month is a valid single-point range
        assert!(PeriodRange::from_query(Some("2025/01"), Some("2025/01")).is_ok());
    }

    #[test]
    fn year_order_dominates_month_order() {
        let a = Period { year: 2024, month: 12 };
        let b = Period { year: 2025, month: 1 };
        assert!(a < b);
    }
}
