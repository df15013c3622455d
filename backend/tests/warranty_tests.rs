//! Warranty expiry derivation tests

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use shared::validation::warranty_expiry;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_years() {
        assert_eq!(
            warranty_expiry("2 Years", date(2024, 3, 15)),
            Some(date(2026, 3, 15))
        );
        assert_eq!(
            warranty_expiry("1 year", date(2024, 3, 15)),
            Some(date(2025, 3, 15))
        );
    }

    #[test]
    fn test_months() {
        assert_eq!(
            warranty_expiry("18 Months", date(2024, 1, 1)),
            Some(date(2025, 7, 1))
        );
        assert_eq!(
            warranty_expiry("6 month", date(2024, 8, 31)),
            Some(date(2025, 2, 28))
        );
    }

    #[test]
    fn test_weeks_and_days() {
        assert_eq!(
            warranty_expiry("2 weeks", date(2024, 1, 1)),
            Some(date(2024, 1, 15))
        );
        assert_eq!(
            warranty_expiry("90 days", date(2024, 1, 1)),
            Some(date(2024, 3, 31))
        );
    }

    #[test]
    fn test_leap_day_clamps() {
        // 12 months from Feb 29 lands on Feb 28 of the non-leap year
        assert_eq!(
            warranty_expiry("12 months", date(2024, 2, 29)),
            Some(date(2025, 2, 28))
        );
    }

    #[test]
    fn test_trailing_text_is_ignored() {
        assert_eq!(
            warranty_expiry("3 years on-site support", date(2024, 1, 1)),
            Some(date(2027, 1, 1))
        );
    }

    #[test]
    fn test_unparseable_yields_none() {
        assert_eq!(warranty_expiry("lifetime", date(2024, 1, 1)), None);
        assert_eq!(warranty_expiry("", date(2024, 1, 1)), None);
        assert_eq!(warranty_expiry("call vendor", date(2024, 1, 1)), None);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Parsing arbitrary text never panics
    #[test]
    fn prop_never_panics(text in ".{0,60}") {
        let _ = warranty_expiry(&text, date(2024, 6, 1));
    }

    /// A parsed duration always yields a date at or after the start
    #[test]
    fn prop_expiry_not_before_start(
        n in 0u32..200,
        unit in prop_oneof![
            Just("year"), Just("years"), Just("month"), Just("months"),
            Just("week"), Just("weeks"), Just("day"), Just("days"),
        ],
        y in 2000i32..2060,
        m in 1u32..=12,
        d in 1u32..=28,
    ) {
        let start = date(y, m, d);
        let text = format!("{} {}", n, unit);
        if let Some(expiry) = warranty_expiry(&text, start) {
            prop_assert!(expiry >= start);
        }
    }

    /// Year durations keep the day of month when the start day fits
    #[test]
    fn prop_years_preserve_day(
        n in 1u32..20,
        y in 2000i32..2050,
        m in 1u32..=12,
        d in 1u32..=28,
    ) {
        let start = date(y, m, d);
        let expiry = warranty_expiry(&format!("{} years", n), start);
        prop_assert_eq!(expiry.map(|e| e.day()), Some(d));
    }
}
