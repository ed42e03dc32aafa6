//! Monthly aggregation of daily results.
//!
//! Folds a month of [`DailyStaffingCompliance`] values into a
//! [`MonthlyComplianceSummary`] and a [`WorkScheduleReport`]. Everything is
//! accumulated in ordered maps and integer minutes, so the result does not
//! depend on the order of the input.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{
    ComplianceStatus, ComplianceWarningType, DailyStaffingCompliance, MonthlyAggregate,
    MonthlyComplianceSummary, PersonnelType, StaffScheduleLine, WarningFrequency,
    WorkScheduleReport, WorkStyle,
};

use super::fte::minutes_to_hours;

#[derive(Default)]
struct StaffAccumulator {
    name: String,
    total_minutes: i64,
    minutes_by_type: BTreeMap<PersonnelType, i64>,
    minutes_by_style: BTreeMap<WorkStyle, i64>,
    unclassified_minutes: i64,
    days_worked: u32,
    non_compliant_days_worked: u32,
}

/// Rolls daily results up into a monthly summary and work-schedule report.
///
/// Per-addition counts expose both `at_risk_days` (every day the addition
/// had a gap) and `at_risk_days_with_data` (only days with a known child
/// headcount), plus `insufficient_data_days`, so the consumer decides how
/// unknown-headcount days affect billing.
///
/// Report hours are the staff's scheduled hours net of breaks, regardless
/// of the day's compliance status.
///
/// # Example
///
/// ```
/// use staffing_compliance::calculation::aggregate_month;
///
/// let aggregate = aggregate_month(&[]);
/// assert_eq!(aggregate.summary.total_days, 0);
/// assert!(aggregate.report.staff.is_empty());
/// ```
pub fn aggregate_month(daily_results: &[DailyStaffingCompliance]) -> MonthlyAggregate {
    let mut summary = MonthlyComplianceSummary::default();
    let mut warning_counts: BTreeMap<ComplianceWarningType, u32> = BTreeMap::new();
    let mut staff: BTreeMap<&str, StaffAccumulator> = BTreeMap::new();
    let mut period: Option<(NaiveDate, NaiveDate)> = None;
    let mut non_compliant_days = 0;

    for day in daily_results {
        summary.total_days += 1;
        match day.status {
            ComplianceStatus::Compliant => summary.compliant_days += 1,
            ComplianceStatus::Understaffed => summary.understaffed_days += 1,
            ComplianceStatus::AdditionAtRisk => summary.addition_at_risk_days += 1,
            ComplianceStatus::InsufficientData => summary.insufficient_data_days += 1,
            ComplianceStatus::NeedsReview => summary.needs_review_days += 1,
        }
        let non_compliant = day.status.is_non_compliant();
        if non_compliant {
            non_compliant_days += 1;
        }

        period = Some(match period {
            Some((start, end)) => (start.min(day.date), end.max(day.date)),
            None => (day.date, day.date),
        });

        for result in &day.addition_results {
            let count = summary
                .additions
                .entry(result.addition_code.clone())
                .or_default();
            count.evaluated_days += 1;
            if day.child_headcount.is_none() {
                count.insufficient_data_days += 1;
            }
            if !result.satisfied {
                count.at_risk_days += 1;
                if day.child_headcount.is_some() {
                    count.at_risk_days_with_data += 1;
                }
            }
        }

        for warning in &day.warnings {
            *warning_counts.entry(warning.warning_type).or_default() += 1;
        }

        for contribution in &day.breakdown.staff {
            let line = staff.entry(contribution.staff_id.as_str()).or_default();
            // Smallest non-empty name wins so the result is order independent.
            if !contribution.name.is_empty()
                && (line.name.is_empty() || contribution.name < line.name)
            {
                line.name = contribution.name.clone();
            }

            let minutes = contribution.scheduled_minutes;
            line.total_minutes += minutes;
            match contribution.personnel_type {
                Some(t) => *line.minutes_by_type.entry(t).or_default() += minutes,
                None => line.unclassified_minutes += minutes,
            }
            if let Some(style) = contribution.work_style {
                *line.minutes_by_style.entry(style).or_default() += minutes;
            }
            line.days_worked += 1;
            if non_compliant {
                line.non_compliant_days_worked += 1;
            }
        }
    }

    let mut warning_frequencies: Vec<WarningFrequency> = warning_counts
        .into_iter()
        .map(|(warning_type, count)| WarningFrequency {
            warning_type,
            count,
        })
        .collect();
    warning_frequencies.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.warning_type.cmp(&b.warning_type))
    });
    summary.warning_frequencies = warning_frequencies;

    let report = build_report(staff, period, non_compliant_days);

    MonthlyAggregate { summary, report }
}

fn build_report(
    staff: BTreeMap<&str, StaffAccumulator>,
    period: Option<(NaiveDate, NaiveDate)>,
    non_compliant_days: u32,
) -> WorkScheduleReport {
    let mut type_minutes: BTreeMap<PersonnelType, i64> = BTreeMap::new();
    let mut style_minutes: BTreeMap<WorkStyle, i64> = BTreeMap::new();
    let mut unclassified_minutes = 0;

    let lines = staff
        .into_iter()
        .map(|(staff_id, acc)| {
            for (t, m) in &acc.minutes_by_type {
                *type_minutes.entry(*t).or_default() += m;
            }
            for (s, m) in &acc.minutes_by_style {
                *style_minutes.entry(*s).or_default() += m;
            }
            unclassified_minutes += acc.unclassified_minutes;

            StaffScheduleLine {
                staff_id: staff_id.to_string(),
                name: acc.name,
                total_hours: minutes_to_hours(acc.total_minutes),
                hours_by_personnel_type: to_hours(acc.minutes_by_type),
                hours_by_work_style: to_hours(acc.minutes_by_style),
                unclassified_hours: minutes_to_hours(acc.unclassified_minutes),
                days_worked: acc.days_worked,
                non_compliant_days_worked: acc.non_compliant_days_worked,
            }
        })
        .collect();

    WorkScheduleReport {
        period_start: period.map(|(start, _)| start),
        period_end: period.map(|(_, end)| end),
        month: period.and_then(|(start, end)| shared_month(start, end)),
        staff: lines,
        hours_by_personnel_type: to_hours(type_minutes),
        hours_by_work_style: to_hours(style_minutes),
        unclassified_hours: minutes_to_hours(unclassified_minutes),
        non_compliant_days,
    }
}

fn shared_month(start: NaiveDate, end: NaiveDate) -> Option<String> {
    (start.year() == end.year() && start.month() == end.month())
        .then(|| start.format("%Y-%m").to_string())
}

fn to_hours<K: Ord>(minutes: BTreeMap<K, i64>) -> BTreeMap<K, Decimal> {
    minutes
        .into_iter()
        .map(|(k, m)| (k, minutes_to_hours(m)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AdditionCheckResult, ComplianceSeverity, ComplianceWarning, StaffComplianceBreakdown,
        StaffContribution,
    };
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn contribution(
        staff_id: &str,
        personnel_type: Option<PersonnelType>,
        minutes: i64,
    ) -> StaffContribution {
        StaffContribution {
            staff_id: staff_id.to_string(),
            name: staff_id.to_uppercase(),
            known: personnel_type.is_some(),
            personnel_type,
            work_style: personnel_type.map(|_| WorkStyle::FullTime),
            qualifications: BTreeSet::new(),
            shift_ids: vec![],
            scheduled_minutes: minutes,
            scheduled_hours: minutes_to_hours(minutes),
            fte_weight: Decimal::ONE,
            block_fte: BTreeMap::new(),
            is_manager: false,
            is_service_manager: false,
            full_time_dedicated: false,
        }
    }

    fn warning(warning_type: ComplianceWarningType) -> ComplianceWarning {
        ComplianceWarning {
            warning_type,
            severity: ComplianceSeverity::Warning,
            time_range: None,
            block_ids: vec![],
            addition_code: None,
            staff_id: None,
            message: String::new(),
        }
    }

    fn day(
        d: u32,
        status: ComplianceStatus,
        headcount: Option<u32>,
        addition_satisfied: bool,
        staff: Vec<StaffContribution>,
        warnings: Vec<ComplianceWarning>,
    ) -> DailyStaffingCompliance {
        DailyStaffingCompliance {
            facility_id: "fac_001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, d).unwrap(),
            status,
            child_headcount: headcount,
            warnings,
            breakdown: StaffComplianceBreakdown {
                staff,
                blocks: vec![],
            },
            addition_results: vec![AdditionCheckResult {
                addition_code: "life_support_staffing".to_string(),
                name: "Life support".to_string(),
                satisfied: addition_satisfied,
                checked_blocks: vec!["am".to_string()],
                gaps: vec![],
            }],
            audit_steps: vec![],
        }
    }

    #[test]
    fn test_status_counts_and_addition_counts() {
        let days = vec![
            day(1, ComplianceStatus::Compliant, Some(6), true, vec![], vec![]),
            day(2, ComplianceStatus::AdditionAtRisk, Some(6), false, vec![], vec![]),
            day(3, ComplianceStatus::InsufficientData, None, false, vec![], vec![]),
            day(4, ComplianceStatus::Understaffed, Some(6), true, vec![], vec![]),
        ];
        let summary = aggregate_month(&days).summary;

        assert_eq!(summary.total_days, 4);
        assert_eq!(summary.compliant_days, 1);
        assert_eq!(summary.addition_at_risk_days, 1);
        assert_eq!(summary.insufficient_data_days, 1);
        assert_eq!(summary.understaffed_days, 1);

        let count = summary.additions["life_support_staffing"];
        assert_eq!(count.evaluated_days, 4);
        assert_eq!(count.at_risk_days, 2);
        assert_eq!(count.at_risk_days_with_data, 1);
        assert_eq!(count.insufficient_data_days, 1);
    }

    #[test]
    fn test_report_sums_hours_by_type_and_style() {
        let days = vec![
            day(
                1,
                ComplianceStatus::Understaffed,
                Some(6),
                true,
                vec![
                    contribution("st_1", Some(PersonnelType::ChildcareWorker), 480),
                    contribution("ghost", None, 240),
                ],
                vec![],
            ),
            day(
                2,
                ComplianceStatus::Compliant,
                Some(6),
                true,
                vec![contribution("st_1", Some(PersonnelType::ChildcareWorker), 450)],
                vec![],
            ),
        ];
        let report = aggregate_month(&days).report;

        assert_eq!(report.period_start, NaiveDate::from_ymd_opt(2025, 4, 1));
        assert_eq!(report.period_end, NaiveDate::from_ymd_opt(2025, 4, 2));
        assert_eq!(report.month.as_deref(), Some("2025-04"));
        assert_eq!(report.non_compliant_days, 1);
        assert_eq!(
            report.hours_by_personnel_type[&PersonnelType::ChildcareWorker],
            dec("15.5")
        );
        assert_eq!(report.hours_by_work_style[&WorkStyle::FullTime], dec("15.5"));
        assert_eq!(report.unclassified_hours, dec("4"));

        let st_1 = report.staff.iter().find(|l| l.staff_id == "st_1").unwrap();
        assert_eq!(st_1.name, "ST_1");
        assert_eq!(st_1.total_hours, dec("15.5"));
        assert_eq!(st_1.days_worked, 2);
        assert_eq!(st_1.non_compliant_days_worked, 1);
    }

    #[test]
    fn test_report_month_only_when_dates_share_one() {
        let mut days = vec![day(30, ComplianceStatus::Compliant, Some(6), true, vec![], vec![])];
        let mut next = day(1, ComplianceStatus::Compliant, Some(6), true, vec![], vec![]);
        next.date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        days.push(next);

        let report = aggregate_month(&days).report;
        assert_eq!(report.month, None);
        assert_eq!(report.period_end, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(aggregate_month(&[]).report.month, None);
    }

    #[test]
    fn test_warning_frequencies_sorted_by_count() {
        let days = vec![
            day(
                1,
                ComplianceStatus::Understaffed,
                Some(6),
                true,
                vec![],
                vec![
                    warning(ComplianceWarningType::AdditionGap),
                    warning(ComplianceWarningType::RatioViolation),
                    warning(ComplianceWarningType::AdditionGap),
                ],
            ),
            day(
                2,
                ComplianceStatus::NeedsReview,
                Some(6),
                true,
                vec![],
                vec![warning(ComplianceWarningType::OverlappingShift)],
            ),
        ];
        let summary = aggregate_month(&days).summary;

        assert_eq!(summary.needs_review_days, 1);
        let kinds: Vec<_> = summary
            .warning_frequencies
            .iter()
            .map(|f| (f.warning_type, f.count))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (ComplianceWarningType::AdditionGap, 2),
                (ComplianceWarningType::RatioViolation, 1),
                (ComplianceWarningType::OverlappingShift, 1),
            ]
        );
    }

    const STATUSES: [ComplianceStatus; 5] = [
        ComplianceStatus::Compliant,
        ComplianceStatus::Understaffed,
        ComplianceStatus::AdditionAtRisk,
        ComplianceStatus::InsufficientData,
        ComplianceStatus::NeedsReview,
    ];

    fn arb_days() -> impl Strategy<Value = Vec<DailyStaffingCompliance>> {
        prop::collection::vec(
            (0usize..5, 0i64..600, any::<bool>(), 0usize..3, 1u32..29),
            1..25,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(status, minutes, satisfied, staff_idx, d)| {
                    let status = STATUSES[status];
                    let headcount = (status != ComplianceStatus::InsufficientData).then_some(5);
                    let staff_id = format!("st_{}", staff_idx);
                    let personnel_type = (staff_idx != 2).then_some(PersonnelType::ChildcareWorker);
                    day(
                        d,
                        status,
                        headcount,
                        satisfied,
                        vec![contribution(&staff_id, personnel_type, minutes)],
                        vec![warning(ComplianceWarningType::AdditionGap)],
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_aggregation_is_order_independent(
            (days, shuffled) in arb_days().prop_flat_map(|days| {
                (Just(days.clone()), Just(days).prop_shuffle())
            })
        ) {
            prop_assert_eq!(aggregate_month(&days), aggregate_month(&shuffled));
        }
    }
}
