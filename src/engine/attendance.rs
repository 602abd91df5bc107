use crate::model::attendance::{AttendanceRecord, AttendanceStatus};

/// Day counts for one employee and month, derived from the effective
/// attendance set (records left after timesheet-compliance exclusions).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceSummary {
    pub total_days: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub half_days: u32,
    pub paid_leave_days: u32,
    pub weekoff_days: u32,
    pub holiday_days: u32,
    pub late_days: u32,
    pub early_checkout_days: u32,
    pub paid_absent_days: u32,
    pub unpaid_absent_days: u32,
    pub not_marked_days: u32,
    pub paid_days: f64,
}

/// Classifies records into status buckets and derives the paid-day total.
/// The first absence of the month is paid; every further absence is unpaid.
pub fn aggregate(records: &[&AttendanceRecord], total_days: u32) -> AttendanceSummary {
    let mut summary = AttendanceSummary {
        total_days,
        ..AttendanceSummary::default()
    };

    for record in records {
        match record.status {
            s if s.counts_as_present() => summary.present_days += 1,
            s if s.is_paid_leave() => summary.paid_leave_days += 1,
            AttendanceStatus::Absent => summary.absent_days += 1,
            AttendanceStatus::HalfDay => summary.half_days += 1,
            AttendanceStatus::Weekoff => summary.weekoff_days += 1,
            AttendanceStatus::Holiday => summary.holiday_days += 1,
            _ => {}
        }

        if record.is_late {
            summary.late_days += 1;
        }
        if record.is_early_checkout {
            summary.early_checkout_days += 1;
        }
    }

    summary.paid_absent_days = summary.absent_days.min(1);
    summary.unpaid_absent_days = summary.absent_days.saturating_sub(1);
    summary.not_marked_days = total_days.saturating_sub(records.len() as u32);

    let paid = (summary.present_days
        + summary.weekoff_days
        + summary.holiday_days
        + summary.paid_leave_days
        + summary.paid_absent_days) as f64
        + 0.5 * summary.half_days as f64;
    summary.paid_days = paid.clamp(0.0, total_days as f64);

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            employee_id: 1001,
            date: date.to_string(),
            status,
            check_in: None,
            check_out: None,
            is_late: false,
            late_minutes: 0,
            is_early_checkout: false,
        }
    }

    fn refs(records: &[AttendanceRecord]) -> Vec<&AttendanceRecord> {
        records.iter().collect()
    }

    #[test]
    fn buckets_statuses_and_derives_paid_days() {
        let records = vec![
            record("2026-01-01", AttendanceStatus::Present),
            record("2026-01-02", AttendanceStatus::CheckedOut),
            record("2026-01-03", AttendanceStatus::WorkFromHome),
            record("2026-01-04", AttendanceStatus::Weekoff),
            record("2026-01-05", AttendanceStatus::Holiday),
            record("2026-01-06", AttendanceStatus::SickLeave),
            record("2026-01-07", AttendanceStatus::HalfDay),
            record("2026-01-08", AttendanceStatus::Absent),
        ];
        let summary = aggregate(&refs(&records), 31);

        assert_eq!(summary.present_days, 3);
        assert_eq!(summary.weekoff_days, 1);
        assert_eq!(summary.holiday_days, 1);
        assert_eq!(summary.paid_leave_days, 1);
        assert_eq!(summary.half_days, 1);
        assert_eq!(summary.absent_days, 1);
        // 3 present + 1 weekoff + 1 holiday + 1 leave + 1 paid absence + 0.5
        assert_eq!(summary.paid_days, 7.5);
        assert_eq!(summary.not_marked_days, 23);
    }

    #[test]
    fn first_absence_is_paid_rest_are_not() {
        let one = vec![record("2026-01-05", AttendanceStatus::Absent)];
        let summary = aggregate(&refs(&one), 31);
        assert_eq!(summary.paid_absent_days, 1);
        assert_eq!(summary.unpaid_absent_days, 0);
        assert_eq!(summary.paid_days, 1.0);

        let three = vec![
            record("2026-01-05", AttendanceStatus::Absent),
            record("2026-01-06", AttendanceStatus::Absent),
            record("2026-01-07", AttendanceStatus::Absent),
        ];
        let summary = aggregate(&refs(&three), 31);
        assert_eq!(summary.paid_absent_days, 1);
        assert_eq!(summary.unpaid_absent_days, 2);
    }

    #[test]
    fn late_and_early_checkout_flags_are_counted() {
        let mut a = record("2026-01-05", AttendanceStatus::Present);
        a.is_late = true;
        a.late_minutes = 12;
        let mut b = record("2026-01-06", AttendanceStatus::CheckedOut);
        b.is_early_checkout = true;
        let records = vec![a, b];

        let summary = aggregate(&refs(&records), 31);
        assert_eq!(summary.late_days, 1);
        assert_eq!(summary.early_checkout_days, 1);
    }

    #[test]
    fn paid_days_stay_within_calendar_bounds() {
        let records: Vec<AttendanceRecord> = (1..=28)
            .map(|d| record(&format!("2026-02-{d:02}"), AttendanceStatus::Present))
            .collect();
        let summary = aggregate(&refs(&records), 28);
        assert_eq!(summary.paid_days, 28.0);
        assert_eq!(summary.not_marked_days, 0);

        let empty: Vec<AttendanceRecord> = Vec::new();
        let summary = aggregate(&refs(&empty), 28);
        assert_eq!(summary.paid_days, 0.0);
        assert_eq!(summary.not_marked_days, 28);
    }
}
