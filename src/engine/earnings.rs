use crate::model::policy::CompensationPolicy;

/// Pro-rated earnings for one month. `employer_incentive` is carried at its
/// full fixed value regardless of attendance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Earnings {
    pub basic: f64,
    pub hra: f64,
    pub travel: f64,
    pub children_education: f64,
    pub fixed_incentive: f64,
    pub employer_incentive: f64,
    pub base_salary: f64,
}

impl Earnings {
    /// Earned gross: the five pro-rated components, employer incentive
    /// excluded. Percentage-of-gross statutory fields use this base.
    pub fn earned_gross(&self) -> f64 {
        self.basic + self.hra + self.travel + self.children_education + self.fixed_incentive
    }
}

/// Scales each policy component by paid days over calendar days, rounding
/// to the nearest rupee per component.
pub fn calculate(policy: Option<&CompensationPolicy>, total_days: u32, paid_days: f64) -> Earnings {
    let Some(policy) = policy else {
        return Earnings::default();
    };

    let prorate = |amount: f64| (amount / total_days as f64 * paid_days).round();

    let mut earnings = Earnings {
        basic: prorate(policy.basic_salary),
        hra: prorate(policy.hra),
        travel: prorate(policy.travel_allowance),
        children_education: prorate(policy.children_education),
        fixed_incentive: prorate(policy.fixed_incentive),
        employer_incentive: policy.employer_incentive,
        base_salary: 0.0,
    };
    earnings.base_salary = earnings.earned_gross() + earnings.employer_incentive;
    earnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::policy::StatutoryRate;

    fn policy() -> CompensationPolicy {
        CompensationPolicy {
            id: 1,
            employee_id: 1001,
            basic_salary: 30000.0,
            hra: 12000.0,
            travel_allowance: 1600.0,
            children_education: 200.0,
            fixed_incentive: 2000.0,
            employer_incentive: 1000.0,
            pf_employee: StatutoryRate::Exempt,
            pf_employer: StatutoryRate::Exempt,
            esi: StatutoryRate::Exempt,
            lwf: StatutoryRate::Exempt,
            ex_gratia: StatutoryRate::Exempt,
            late_penalty_per_minute: 0.0,
            is_active: true,
        }
    }

    #[test]
    fn full_month_earns_the_full_components() {
        let earnings = calculate(Some(&policy()), 30, 30.0);
        assert_eq!(earnings.basic, 30000.0);
        assert_eq!(earnings.hra, 12000.0);
        assert_eq!(earnings.earned_gross(), 45800.0);
        assert_eq!(earnings.base_salary, 46800.0);
    }

    #[test]
    fn components_are_prorated_and_rounded_per_component() {
        let earnings = calculate(Some(&policy()), 30, 20.0);
        assert_eq!(earnings.basic, 20000.0);
        assert_eq!(earnings.hra, 8000.0);
        // 1600 / 30 * 20 = 1066.67 -> 1067
        assert_eq!(earnings.travel, 1067.0);
        // 200 / 30 * 20 = 133.33 -> 133
        assert_eq!(earnings.children_education, 133.0);
    }

    #[test]
    fn employer_incentive_is_never_prorated() {
        let earnings = calculate(Some(&policy()), 30, 10.0);
        assert_eq!(earnings.employer_incentive, 1000.0);
        assert_eq!(earnings.base_salary, earnings.earned_gross() + 1000.0);
    }

    #[test]
    fn no_policy_means_zero_earnings() {
        assert_eq!(calculate(None, 30, 30.0), Earnings::default());
    }
}
