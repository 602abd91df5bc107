use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::engine::result::TimingAdjustment;
use crate::model::attendance::AttendanceRecord;

/// Expected check-in is 10:00; the check-out window closes at 18:00.
const TIMELY_CHECK_IN_MIN: u32 = 10 * 60;
const CHECKOUT_WINDOW_END_MIN: u32 = 18 * 60;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingOutcome {
    pub entries: Vec<TimingAdjustment>,
    /// Sum of entry amounts; always <= 0
    pub total: f64,
}

/// Parses a stored check-in/check-out value into a minute of day. Accepts
/// clock values with or without seconds and full timestamps; anything else
/// means the day has no usable timing data.
fn minute_of_day(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let time = NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.time()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.time()))
        .ok()?;
    Some(time.hour() * 60 + time.minute())
}

fn clock(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Check-in deduction tiers. `None` means the check-in was timely.
fn check_in_fraction(minute: u32) -> Option<f64> {
    if minute <= TIMELY_CHECK_IN_MIN {
        None
    } else if minute <= 11 * 60 {
        Some(0.25)
    } else if minute <= 12 * 60 {
        Some(0.50)
    } else if minute <= 14 * 60 {
        Some(0.50)
    } else if minute <= 16 * 60 {
        Some(0.75)
    } else {
        Some(1.00)
    }
}

/// Check-out deduction tiers, evaluated only after a timely check-in.
/// `None` means the employee left after the window closed.
fn check_out_fraction(minute: u32) -> Option<f64> {
    if minute < 14 * 60 {
        Some(1.00)
    } else if minute <= 17 * 60 {
        Some(0.50)
    } else if minute <= CHECKOUT_WINDOW_END_MIN {
        Some(0.25)
    } else {
        None
    }
}

/// Walks the month's effective attendance in date order and applies the
/// tiered check-in/check-out deduction rules. The streak counters only
/// decorate the reason with "(consecutive)" on repeat occurrences of the
/// mildest tiers; the deduction magnitude never escalates.
pub fn evaluate(records: &[&AttendanceRecord], daily_rate: f64) -> TimingOutcome {
    let mut outcome = TimingOutcome::default();
    let mut late_streak: u32 = 0;
    let mut early_checkout_streak: u32 = 0;

    for record in records {
        if !record.status.counts_as_present() {
            late_streak = 0;
            early_checkout_streak = 0;
            continue;
        }

        let Some(check_in) = record.check_in.as_deref().and_then(minute_of_day) else {
            continue;
        };

        match check_in_fraction(check_in) {
            Some(fraction) => {
                // streak only tracks the 10:01-11:00 tier
                let consecutive = if check_in <= 11 * 60 {
                    late_streak += 1;
                    late_streak > 1
                } else {
                    false
                };

                let mut reason = format!(
                    "Late check-in at {} ({:.0}% of daily rate)",
                    clock(check_in),
                    fraction * 100.0
                );
                if consecutive {
                    reason.push_str(" (consecutive)");
                }

                outcome.entries.push(TimingAdjustment {
                    date: record.date.clone(),
                    amount: -(fraction * daily_rate),
                    reason,
                });
            }
            None => {
                late_streak = 0;

                // check-out rules apply only when check-in was timely
                let Some(check_out) = record.check_out.as_deref().and_then(minute_of_day) else {
                    continue;
                };

                match check_out_fraction(check_out) {
                    Some(fraction) => {
                        // streak only tracks the 17:01-18:00 tier
                        let consecutive = if check_out > 17 * 60 {
                            early_checkout_streak += 1;
                            early_checkout_streak > 1
                        } else {
                            false
                        };

                        let mut reason = format!(
                            "Early check-out at {} ({:.0}% of daily rate)",
                            clock(check_out),
                            fraction * 100.0
                        );
                        if consecutive {
                            reason.push_str(" (consecutive)");
                        }

                        outcome.entries.push(TimingAdjustment {
                            date: record.date.clone(),
                            amount: -(fraction * daily_rate),
                            reason,
                        });
                    }
                    None => early_checkout_streak = 0,
                }
            }
        }
    }

    outcome.total = outcome.entries.iter().map(|e| e.amount).sum();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;

    fn day(date: &str, status: AttendanceStatus, check_in: Option<&str>, check_out: Option<&str>) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            employee_id: 1001,
            date: date.to_string(),
            status,
            check_in: check_in.map(str::to_string),
            check_out: check_out.map(str::to_string),
            is_late: false,
            late_minutes: 0,
            is_early_checkout: false,
        }
    }

    fn evaluate_one(record: AttendanceRecord, daily_rate: f64) -> TimingOutcome {
        evaluate(&[&record], daily_rate)
    }

    #[test]
    fn timely_check_in_costs_nothing() {
        let outcome = evaluate_one(
            day("2026-01-05", AttendanceStatus::Present, Some("10:00:00"), None),
            1000.0,
        );
        assert!(outcome.entries.is_empty());
        assert_eq!(outcome.total, 0.0);
    }

    #[test]
    fn one_minute_late_hits_the_quarter_tier() {
        let outcome = evaluate_one(
            day("2026-01-05", AttendanceStatus::Present, Some("10:01:00"), None),
            1000.0,
        );
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].amount, -250.0);
    }

    #[test]
    fn check_in_tier_boundaries() {
        let cases = [
            ("11:00", -250.0),
            ("11:01", -500.0),
            ("12:00", -500.0),
            ("13:30", -500.0),
            ("14:01", -750.0),
            ("16:00", -750.0),
            ("16:01", -1000.0),
            ("19:30", -1000.0),
        ];
        for (check_in, expected) in cases {
            let outcome = evaluate_one(
                day("2026-01-05", AttendanceStatus::Present, Some(check_in), None),
                1000.0,
            );
            assert_eq!(outcome.total, expected, "check-in {check_in}");
        }
    }

    #[test]
    fn late_check_in_skips_check_out_rules() {
        // 11:15 in, 18:30 out, 1000/day -> only the 50% check-in tier applies
        let outcome = evaluate_one(
            day("2026-01-05", AttendanceStatus::Present, Some("11:15"), Some("18:30")),
            1000.0,
        );
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.total, -500.0);
        assert!(outcome.entries[0].reason.contains("11:15"));
    }

    #[test]
    fn check_out_tiers_after_timely_check_in() {
        let cases = [
            ("13:59", -1000.0),
            ("14:30", -500.0),
            ("17:00", -500.0),
            ("17:30", -250.0),
            ("18:00", -250.0),
            ("18:01", 0.0),
        ];
        for (check_out, expected) in cases {
            let outcome = evaluate_one(
                day("2026-01-05", AttendanceStatus::CheckedOut, Some("09:45"), Some(check_out)),
                1000.0,
            );
            assert_eq!(outcome.total, expected, "check-out {check_out}");
        }
    }

    #[test]
    fn mild_lateness_streak_is_labelled_but_never_escalates() {
        let records = vec![
            day("2026-01-05", AttendanceStatus::Present, Some("10:30"), None),
            day("2026-01-06", AttendanceStatus::Present, Some("10:45"), None),
            day("2026-01-07", AttendanceStatus::Present, Some("10:20"), None),
        ];
        let refs: Vec<&AttendanceRecord> = records.iter().collect();
        let outcome = evaluate(&refs, 1000.0);

        assert_eq!(outcome.entries.len(), 3);
        assert!(!outcome.entries[0].reason.contains("(consecutive)"));
        assert!(outcome.entries[1].reason.contains("(consecutive)"));
        assert!(outcome.entries[2].reason.contains("(consecutive)"));
        // same magnitude regardless of streak length
        assert!(outcome.entries.iter().all(|e| e.amount == -250.0));
    }

    #[test]
    fn streaks_reset_on_non_present_days_and_timely_events() {
        let records = vec![
            day("2026-01-05", AttendanceStatus::Present, Some("10:30"), None),
            day("2026-01-06", AttendanceStatus::Weekoff, None, None),
            day("2026-01-07", AttendanceStatus::Present, Some("10:30"), None),
            day("2026-01-08", AttendanceStatus::Present, Some("09:55"), None),
            day("2026-01-09", AttendanceStatus::Present, Some("10:30"), None),
        ];
        let refs: Vec<&AttendanceRecord> = records.iter().collect();
        let outcome = evaluate(&refs, 1000.0);

        assert_eq!(outcome.entries.len(), 3);
        assert!(outcome.entries.iter().all(|e| !e.reason.contains("(consecutive)")));
    }

    #[test]
    fn unparsable_timestamps_contribute_nothing() {
        let outcome = evaluate_one(
            day("2026-01-05", AttendanceStatus::Present, Some("not a time"), Some("18:30")),
            1000.0,
        );
        assert!(outcome.entries.is_empty());
    }

    #[test]
    fn full_timestamps_are_accepted() {
        let outcome = evaluate_one(
            day("2026-01-05", AttendanceStatus::Present, Some("2026-01-05 10:31:00"), None),
            1000.0,
        );
        assert_eq!(outcome.total, -250.0);
    }

    #[test]
    fn missing_check_out_after_timely_check_in_costs_nothing() {
        let outcome = evaluate_one(
            day("2026-01-05", AttendanceStatus::Present, Some("09:00"), None),
            1000.0,
        );
        assert!(outcome.entries.is_empty());
    }
}
