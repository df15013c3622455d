//! Validation utilities and pure derivations for the platform

use chrono::{Days, Months, NaiveDate};

// ============================================================================
// Warranty Derivation
// ============================================================================

/// Compute an absolute warranty expiry date from a free-text duration such as
/// "3 Years", "12 Months" or "2 weeks" and a start date.
///
/// The first integer followed by a year/month/week/day unit (case-insensitive,
/// optional trailing "s") is used; years and months shift the calendar date,
/// weeks and days add fixed day counts. Empty or unparseable input yields
/// `None` rather than an error.
pub fn warranty_expiry(warranty: &str, start: NaiveDate) -> Option<NaiveDate> {
    let mut chars = warranty.chars().peekable();

    // First run of digits
    while let Some(c) = chars.peek() {
        if c.is_ascii_digit() {
            break;
        }
        chars.next();
    }
    let mut count: u64 = 0;
    let mut saw_digit = false;
    while let Some(c) = chars.peek() {
        match c.to_digit(10) {
            Some(d) => {
                saw_digit = true;
                count = count.saturating_mul(10).saturating_add(d as u64);
                chars.next();
            }
            None => break,
        }
    }
    if !saw_digit || count > 10_000 {
        return None;
    }

    // Unit word following the number
    while let Some(c) = chars.peek() {
        if c.is_alphabetic() {
            break;
        }
        chars.next();
    }
    let unit: String = chars
        .take_while(|c| c.is_alphabetic())
        .collect::<String>()
        .to_ascii_lowercase();
    let unit = unit.strip_suffix('s').unwrap_or(&unit);

    match unit {
        "year" => start.checked_add_months(Months::new(count as u32 * 12)),
        "month" => start.checked_add_months(Months::new(count as u32)),
        "week" => start.checked_add_days(Days::new(count * 7)),
        "day" => start.checked_add_days(Days::new(count)),
        _ => None,
    }
}

// ============================================================================
// Serial Numbers
// ============================================================================

/// Split a comma-separated serial number string into individual serials,
/// trimming whitespace and dropping empty segments.
pub fn split_serial_numbers(serials: &str) -> Vec<String> {
    serials
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Find the first candidate serial already held by another item.
///
/// `existing` pairs an item name with that item's comma-separated serial
/// string. Returns `(serial, holding item name)` for the first collision.
pub fn first_duplicate_serial(
    candidates: &[String],
    existing: &[(String, String)],
) -> Option<(String, String)> {
    for candidate in candidates {
        for (item_name, serial_csv) in existing {
            if split_serial_numbers(serial_csv)
                .iter()
                .any(|s| s == candidate)
            {
                return Some((candidate.clone(), item_name.clone()));
            }
        }
    }
    None
}

/// Split an aggregate quantity across `parts` items, one per serial number.
/// The remainder lands on the first item so the parts always sum to the
/// total. Returns an empty vector when `parts` is zero.
pub fn fan_out_quantities(total: i32, parts: usize) -> Vec<i32> {
    if parts == 0 {
        return Vec::new();
    }
    let base = total / parts as i32;
    let remainder = total % parts as i32;
    (0..parts)
        .map(|i| if i == 0 { base + remainder } else { base })
        .collect()
}

/// Find the first negative quantity field on an item write, if any.
/// Both the stored quantity and the low-stock threshold must be
/// non-negative.
pub fn negative_quantity_field(quantity: i32, min_stock: i32) -> Option<&'static str> {
    if quantity < 0 {
        Some("quantity")
    } else if min_stock < 0 {
        Some("min_stock")
    } else {
        None
    }
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn warranty_years() {
        assert_eq!(
            warranty_expiry("3 Years", date(2024, 1, 1)),
            Some(date(2027, 1, 1))
        );
        assert_eq!(
            warranty_expiry("1 year", date(2024, 2, 29)),
            Some(date(2025, 2, 28))
        );
    }

    #[test]
    fn warranty_eighteen_months() {
        assert_eq!(
            warranty_expiry("18 Months", date(2024, 1, 1)),
            Some(date(2025, 7, 1))
        );
    }

    #[test]
    fn warranty_weeks_and_days() {
        assert_eq!(
            warranty_expiry("2 weeks", date(2024, 1, 1)),
            Some(date(2024, 1, 15))
        );
        assert_eq!(
            warranty_expiry("10 Days", date(2024, 12, 25)),
            Some(date(2025, 1, 4))
        );
    }

    #[test]
    fn warranty_with_trailing_text() {
        assert_eq!(
            warranty_expiry("2 Years Warranty", date(2024, 1, 1)),
            Some(date(2026, 1, 1))
        );
    }

    #[test]
    fn warranty_unparseable_is_none() {
        assert_eq!(warranty_expiry("", date(2024, 1, 1)), None);
        assert_eq!(warranty_expiry("lifetime", date(2024, 1, 1)), None);
        assert_eq!(warranty_expiry("3 decades", date(2024, 1, 1)), None);
        assert_eq!(warranty_expiry("years", date(2024, 1, 1)), None);
    }

    #[test]
    fn split_serials_trims_and_drops_empty() {
        assert_eq!(
            split_serial_numbers("SN1, SN2 ,,  SN3"),
            vec!["SN1", "SN2", "SN3"]
        );
        assert!(split_serial_numbers("").is_empty());
        assert!(split_serial_numbers(" , ").is_empty());
    }

    #[test]
    fn duplicate_serial_names_offender() {
        let existing = vec![
            ("Laptop A".to_string(), "SN001, SN002".to_string()),
            ("Monitor B".to_string(), "SN100".to_string()),
        ];
        let candidates = vec!["SN999".to_string(), "SN100".to_string()];
        assert_eq!(
            first_duplicate_serial(&candidates, &existing),
            Some(("SN100".to_string(), "Monitor B".to_string()))
        );
        assert_eq!(
            first_duplicate_serial(&["SN777".to_string()], &existing),
            None
        );
    }

    #[test]
    fn negative_quantity_field_reports_first_offender() {
        assert_eq!(negative_quantity_field(-1, 5), Some("quantity"));
        assert_eq!(negative_quantity_field(3, -2), Some("min_stock"));
        assert_eq!(negative_quantity_field(-1, -1), Some("quantity"));
        assert_eq!(negative_quantity_field(0, 0), None);
        assert_eq!(negative_quantity_field(10, 3), None);
    }

    #[test]
    fn fan_out_puts_remainder_first() {
        assert_eq!(fan_out_quantities(10, 3), vec![4, 3, 3]);
        assert_eq!(fan_out_quantities(6, 3), vec![2, 2, 2]);
        assert_eq!(fan_out_quantities(2, 4), vec![2, 0, 0, 0]);
        assert!(fan_out_quantities(5, 0).is_empty());
    }

    proptest! {
        #[test]
        fn fan_out_sums_to_total(total in 0i32..100_000, parts in 1usize..64) {
            let split = fan_out_quantities(total, parts);
            prop_assert_eq!(split.len(), parts);
            prop_assert_eq!(split.iter().sum::<i32>(), total);
        }

        #[test]
        fn warranty_never_panics(s in ".{0,40}") {
            let _ = warranty_expiry(&s, date(2024, 1, 1));
        }
    }
}
