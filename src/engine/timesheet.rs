use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::model::task::{TaskAssignment, TimesheetEntry};

/// A task may go unreported for this long after assignment before its date
/// is penalized.
pub const SUBMISSION_GRACE_HOURS: i64 = 24;

/// Detects the dates penalized for missing timesheet submissions: tasks past
/// the grace window with no entry referencing them (by id, or by title on
/// the assignment date) and no approved waiver for that exact date.
///
/// Each returned date later costs a full day's rate AND drops that date's
/// attendance record from the effective set. Both effects are intended.
pub fn delinquent_dates(
    tasks: &[&TaskAssignment],
    entries: &[&TimesheetEntry],
    waived_dates: &HashSet<String>,
    month: &str,
    as_of: DateTime<Utc>,
) -> Vec<String> {
    let month_prefix = format!("{month}-");
    let mut dates: Vec<String> = Vec::new();

    for task in tasks {
        if as_of.signed_duration_since(task.assigned_at) <= Duration::hours(SUBMISSION_GRACE_HOURS) {
            continue;
        }

        let task_date = task.assigned_at.format("%Y-%m-%d").to_string();
        if !task_date.starts_with(&month_prefix) {
            continue;
        }

        let submitted = entries.iter().any(|entry| {
            entry.task_id == Some(task.id)
                || (entry.task_title.as_deref() == Some(task.title.as_str())
                    && entry.date == task_date)
        });

        if submitted || waived_dates.contains(&task_date) {
            continue;
        }

        if !dates.contains(&task_date) {
            dates.push(task_date);
        }
    }

    dates.sort();
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn task(id: u64, title: &str, assigned_at: &str) -> TaskAssignment {
        TaskAssignment {
            id,
            employee_id: 1001,
            title: title.to_string(),
            assigned_at: at(assigned_at),
        }
    }

    fn entry(task_id: Option<u64>, task_title: Option<&str>, date: &str) -> TimesheetEntry {
        TimesheetEntry {
            id: 0,
            employee_id: 1001,
            task_id,
            task_title: task_title.map(str::to_string),
            date: date.to_string(),
        }
    }

    fn at(raw: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .expect("test timestamp")
            .and_utc()
    }

    #[test]
    fn unreported_task_past_grace_penalizes_its_date() {
        // assigned 2026-01-01, checked 2026-01-03, no entry, no waiver
        let tasks = vec![task(1, "Campaign brief", "2026-01-01 09:00:00")];
        let refs: Vec<&TaskAssignment> = tasks.iter().collect();
        let dates = delinquent_dates(&refs, &[], &HashSet::new(), "2026-01", at("2026-01-03 09:00:00"));
        assert_eq!(dates, vec!["2026-01-01".to_string()]);
    }

    #[test]
    fn tasks_within_the_grace_window_are_not_penalized() {
        let tasks = vec![task(1, "Campaign brief", "2026-01-02 09:00:00")];
        let refs: Vec<&TaskAssignment> = tasks.iter().collect();
        let dates = delinquent_dates(&refs, &[], &HashSet::new(), "2026-01", at("2026-01-03 08:00:00"));
        assert!(dates.is_empty());
    }

    #[test]
    fn an_entry_referencing_the_task_by_id_clears_it() {
        let tasks = vec![task(7, "Campaign brief", "2026-01-01 09:00:00")];
        let entries = vec![entry(Some(7), None, "2026-01-02")];
        let task_refs: Vec<&TaskAssignment> = tasks.iter().collect();
        let entry_refs: Vec<&TimesheetEntry> = entries.iter().collect();
        let dates = delinquent_dates(&task_refs, &entry_refs, &HashSet::new(), "2026-01", at("2026-01-05 09:00:00"));
        assert!(dates.is_empty());
    }

    #[test]
    fn an_entry_matching_title_and_date_clears_it() {
        let tasks = vec![task(7, "Campaign brief", "2026-01-01 09:00:00")];
        let entries = vec![entry(None, Some("Campaign brief"), "2026-01-01")];
        let task_refs: Vec<&TaskAssignment> = tasks.iter().collect();
        let entry_refs: Vec<&TimesheetEntry> = entries.iter().collect();
        let dates = delinquent_dates(&task_refs, &entry_refs, &HashSet::new(), "2026-01", at("2026-01-05 09:00:00"));
        assert!(dates.is_empty());
    }

    #[test]
    fn a_title_match_on_the_wrong_date_does_not_clear_it() {
        let tasks = vec![task(7, "Campaign brief", "2026-01-01 09:00:00")];
        let entries = vec![entry(None, Some("Campaign brief"), "2026-01-04")];
        let task_refs: Vec<&TaskAssignment> = tasks.iter().collect();
        let entry_refs: Vec<&TimesheetEntry> = entries.iter().collect();
        let dates = delinquent_dates(&task_refs, &entry_refs, &HashSet::new(), "2026-01", at("2026-01-05 09:00:00"));
        assert_eq!(dates, vec!["2026-01-01".to_string()]);
    }

    #[test]
    fn a_waiver_for_the_exact_date_clears_it() {
        let tasks = vec![task(1, "Campaign brief", "2026-01-01 09:00:00")];
        let refs: Vec<&TaskAssignment> = tasks.iter().collect();
        let waived: HashSet<String> = ["2026-01-01".to_string()].into_iter().collect();
        let dates = delinquent_dates(&refs, &[], &waived, "2026-01", at("2026-01-05 09:00:00"));
        assert!(dates.is_empty());
    }

    #[test]
    fn each_date_is_penalized_once_and_other_months_are_ignored() {
        let tasks = vec![
            task(1, "Brief A", "2026-01-05 09:00:00"),
            task(2, "Brief B", "2026-01-05 14:00:00"),
            task(3, "Old task", "2025-12-20 09:00:00"),
        ];
        let refs: Vec<&TaskAssignment> = tasks.iter().collect();
        let dates = delinquent_dates(&refs, &[], &HashSet::new(), "2026-01", at("2026-01-10 09:00:00"));
        assert_eq!(dates, vec!["2026-01-05".to_string()]);
    }
}
