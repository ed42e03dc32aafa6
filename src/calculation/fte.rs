//! Full-time-equivalent arithmetic.
//!
//! Presence is converted to FTE per block: the staff member's weight from
//! the rule tables, prorated by the fraction of the block they cover.

use rust_decimal::Decimal;

/// Prorates a full-block FTE weight by the fraction of the block covered.
///
/// The result is not rounded; rounding happens only when presenting values.
///
/// # Examples
///
/// ```
/// use staffing_compliance::calculation::prorated_fte;
/// use rust_decimal::Decimal;
///
/// // Half of a four hour block at full weight.
/// assert_eq!(prorated_fte(Decimal::ONE, 120, 240), Decimal::new(5, 1));
///
/// // Covered minutes beyond the block length are capped.
/// assert_eq!(prorated_fte(Decimal::ONE, 300, 240), Decimal::ONE);
/// ```
pub fn prorated_fte(weight: Decimal, covered_minutes: i64, block_minutes: i64) -> Decimal {
    if block_minutes <= 0 || covered_minutes <= 0 {
        return Decimal::ZERO;
    }
    let covered = covered_minutes.min(block_minutes);
    weight * Decimal::from(covered) / Decimal::from(block_minutes)
}

/// Converts minutes to hours rounded to two decimal places.
///
/// # Examples
///
/// ```
/// use staffing_compliance::calculation::minutes_to_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(minutes_to_hours(450), Decimal::new(750, 2));
/// assert_eq!(minutes_to_hours(20), Decimal::new(33, 2));
/// ```
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_full_block_at_full_weight_is_one() {
        assert_eq!(prorated_fte(Decimal::ONE, 240, 240), Decimal::ONE);
    }

    #[test]
    fn test_partial_block_part_time_weight() {
        // 0.75 weight for one hour of a four hour block
        assert_eq!(prorated_fte(dec("0.75"), 60, 240), dec("0.1875"));
    }

    #[test]
    fn test_thirds_are_not_rounded() {
        let third = prorated_fte(Decimal::ONE, 60, 180);
        assert!(third > dec("0.3333"));
        assert!(third < dec("0.3334"));
        assert!(third + third + third <= Decimal::ONE);
    }

    #[test]
    fn test_zero_or_negative_inputs_yield_zero() {
        assert_eq!(prorated_fte(Decimal::ONE, 0, 240), Decimal::ZERO);
        assert_eq!(prorated_fte(Decimal::ONE, 60, 0), Decimal::ZERO);
        assert_eq!(prorated_fte(Decimal::ONE, -30, 240), Decimal::ZERO);
    }

    #[test]
    fn test_minutes_to_hours_rounds_half_even_at_two_places() {
        assert_eq!(minutes_to_hours(0), Decimal::ZERO);
        assert_eq!(minutes_to_hours(480), dec("8"));
        assert_eq!(minutes_to_hours(10), dec("0.17"));
    }
}
