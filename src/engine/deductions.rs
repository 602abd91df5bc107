use crate::engine::attendance::AttendanceSummary;
use crate::engine::earnings::Earnings;
use crate::model::policy::{CompensationPolicy, StatutoryRate};

/// Statutory and attendance-driven deductions for one month.
/// `pf_employer` is the employer-side contribution: it feeds CTC, not the
/// amount withheld from net salary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deductions {
    pub pf_employee: f64,
    pub pf_employer: f64,
    pub esi: f64,
    pub lwf: f64,
    pub ex_gratia: f64,
    pub late_penalty: f64,
    pub absent_deduction: f64,
}

impl Deductions {
    pub fn statutory_employee_total(&self) -> f64 {
        self.pf_employee + self.esi + self.lwf + self.ex_gratia
    }
}

/// Each late day is charged as a fixed 10-minute block.
const LATE_PENALTY_MINUTES_PER_DAY: f64 = 10.0;

/// Resolves one statutory field: percentage of its base, or a fixed amount
/// pro-rated by paid days.
pub fn statutory_amount(rate: StatutoryRate, percentage_base: f64, paid_days: f64, total_days: u32) -> f64 {
    match rate {
        StatutoryRate::Percentage(pct) => (percentage_base * pct / 100.0).round(),
        StatutoryRate::Fixed(amount) => (amount * paid_days / total_days as f64).round(),
        StatutoryRate::Exempt => 0.0,
    }
}

/// PF and ex-gratia percentages apply to earned basic; ESI and LWF
/// percentages apply to earned gross.
pub fn calculate(
    policy: Option<&CompensationPolicy>,
    earnings: &Earnings,
    summary: &AttendanceSummary,
    total_days: u32,
) -> Deductions {
    let Some(policy) = policy else {
        return Deductions::default();
    };

    let earned_gross = earnings.earned_gross();
    let paid_days = summary.paid_days;

    Deductions {
        pf_employee: statutory_amount(policy.pf_employee, earnings.basic, paid_days, total_days),
        pf_employer: statutory_amount(policy.pf_employer, earnings.basic, paid_days, total_days),
        esi: statutory_amount(policy.esi, earned_gross, paid_days, total_days),
        lwf: statutory_amount(policy.lwf, earned_gross, paid_days, total_days),
        ex_gratia: statutory_amount(policy.ex_gratia, earnings.basic, paid_days, total_days),
        late_penalty: summary.late_days as f64
            * policy.late_penalty_per_minute
            * LATE_PENALTY_MINUTES_PER_DAY,
        absent_deduction: summary.unpaid_absent_days as f64
            * (policy.monthly_gross() / total_days as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::earnings;

    fn policy() -> CompensationPolicy {
        CompensationPolicy {
            id: 1,
            employee_id: 1001,
            basic_salary: 30000.0,
            hra: 0.0,
            travel_allowance: 0.0,
            children_education: 0.0,
            fixed_incentive: 0.0,
            employer_incentive: 0.0,
            pf_employee: StatutoryRate::Percentage(12.0),
            pf_employer: StatutoryRate::Percentage(12.0),
            esi: StatutoryRate::Exempt,
            lwf: StatutoryRate::Fixed(25.0),
            ex_gratia: StatutoryRate::Exempt,
            late_penalty_per_minute: 5.0,
            is_active: true,
        }
    }

    fn summary(paid_days: f64) -> AttendanceSummary {
        AttendanceSummary {
            total_days: 30,
            paid_days,
            ..AttendanceSummary::default()
        }
    }

    #[test]
    fn percentage_rates_apply_to_earned_basic() {
        let p = policy();
        let e = earnings::calculate(Some(&p), 30, 30.0);
        let d = calculate(Some(&p), &e, &summary(30.0), 30);
        assert_eq!(d.pf_employee, 3600.0);
        assert_eq!(d.pf_employer, 3600.0);
    }

    #[test]
    fn fixed_rates_are_prorated_by_paid_days() {
        let p = policy();
        let e = earnings::calculate(Some(&p), 30, 15.0);
        let d = calculate(Some(&p), &e, &summary(15.0), 30);
        // 25 * 15/30 = 12.5 -> 13
        assert_eq!(d.lwf, 13.0);
    }

    #[test]
    fn esi_percentage_uses_earned_gross() {
        let mut p = policy();
        p.hra = 6000.0;
        p.esi = StatutoryRate::Percentage(0.75);
        let e = earnings::calculate(Some(&p), 30, 30.0);
        let d = calculate(Some(&p), &e, &summary(30.0), 30);
        // 0.75% of 36000
        assert_eq!(d.esi, 270.0);
    }

    #[test]
    fn late_penalty_charges_ten_minutes_per_late_day() {
        let p = policy();
        let e = earnings::calculate(Some(&p), 30, 30.0);
        let mut s = summary(30.0);
        s.late_days = 3;
        let d = calculate(Some(&p), &e, &s, 30);
        assert_eq!(d.late_penalty, 150.0);
    }

    #[test]
    fn absent_deduction_covers_only_unpaid_absences() {
        let p = policy();
        let e = earnings::calculate(Some(&p), 30, 29.0);

        // one absence: the paid one, nothing to deduct
        let mut s = summary(29.0);
        s.absent_days = 1;
        s.unpaid_absent_days = 0;
        let d = calculate(Some(&p), &e, &s, 30);
        assert_eq!(d.absent_deduction, 0.0);

        // three absences: two unpaid days at 1000/day
        let mut s = summary(27.0);
        s.absent_days = 3;
        s.unpaid_absent_days = 2;
        let d = calculate(Some(&p), &e, &s, 30);
        assert_eq!(d.absent_deduction, 2000.0);
    }

    #[test]
    fn no_policy_means_zero_deductions() {
        let e = Earnings::default();
        let d = calculate(None, &e, &summary(30.0), 30);
        assert_eq!(d, Deductions::default());
    }
}
