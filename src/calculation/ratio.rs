//! Staff-to-child ratio arithmetic.

use crate::models::StaffingRatio;

/// Returns the staff a ratio requires for a child headcount.
///
/// Always rounds up: partial staff cannot satisfy a ratio.
///
/// # Examples
///
/// ```
/// use staffing_compliance::calculation::required_staff;
/// use staffing_compliance::models::StaffingRatio;
///
/// let one_to_three = StaffingRatio { staff: 1, children: 3 };
/// assert_eq!(required_staff(4, one_to_three), 2);
/// assert_eq!(required_staff(3, one_to_three), 1);
/// assert_eq!(required_staff(0, one_to_three), 0);
/// ```
pub fn required_staff(child_headcount: u32, ratio: StaffingRatio) -> u32 {
    if ratio.children == 0 {
        return 0;
    }
    let needed = u64::from(child_headcount) * u64::from(ratio.staff);
    let required = needed.div_ceil(u64::from(ratio.children));
    u32::try_from(required).unwrap_or(u32::MAX)
}
