use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::mysql::MySqlRow;
use utoipa::ToSchema;

/// A statutory rate is configured as either a percentage of a base amount or
/// a fixed monthly amount, never both. `Exempt` means the field is not
/// configured for this employee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum StatutoryRate {
    Percentage(f64),
    Fixed(f64),
    Exempt,
}

impl StatutoryRate {
    /// Rebuild the variant from the `_mode` / `_value` column pair.
    pub fn from_columns(mode: Option<&str>, value: Option<f64>) -> Self {
        match (mode, value) {
            (Some("percentage"), Some(v)) => StatutoryRate::Percentage(v),
            (Some("fixed"), Some(v)) => StatutoryRate::Fixed(v),
            _ => StatutoryRate::Exempt,
        }
    }
}

impl Default for StatutoryRate {
    fn default() -> Self {
        StatutoryRate::Exempt
    }
}

/// Monthly compensation policy for one employee. At most one policy is
/// active per employee at computation time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompensationPolicy {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 30000.0)]
    pub basic_salary: f64,

    #[schema(example = 12000.0)]
    pub hra: f64,

    #[schema(example = 1600.0)]
    pub travel_allowance: f64,

    #[schema(example = 200.0)]
    pub children_education: f64,

    #[schema(example = 2000.0)]
    pub fixed_incentive: f64,

    /// Added at full value regardless of attendance
    #[schema(example = 1000.0)]
    pub employer_incentive: f64,

    pub pf_employee: StatutoryRate,
    pub pf_employer: StatutoryRate,
    pub esi: StatutoryRate,
    pub lwf: StatutoryRate,
    pub ex_gratia: StatutoryRate,

    #[schema(example = 5.0)]
    pub late_penalty_per_minute: f64,

    pub is_active: bool,
}

impl CompensationPolicy {
    /// Employee-side monthly gross: the five pro-rated components at full
    /// value. Employer incentive stays outside gross.
    pub fn monthly_gross(&self) -> f64 {
        self.basic_salary
            + self.hra
            + self.travel_allowance
            + self.children_education
            + self.fixed_incentive
    }
}

impl<'r> sqlx::FromRow<'r, MySqlRow> for CompensationPolicy {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let rate = |field: &str| -> Result<StatutoryRate, sqlx::Error> {
            let mode: Option<String> = row.try_get(format!("{field}_mode").as_str())?;
            let value: Option<f64> = row.try_get(format!("{field}_value").as_str())?;
            Ok(StatutoryRate::from_columns(mode.as_deref(), value))
        };

        Ok(CompensationPolicy {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            basic_salary: row.try_get("basic_salary")?,
            hra: row.try_get("hra")?,
            travel_allowance: row.try_get("travel_allowance")?,
            children_education: row.try_get("children_education")?,
            fixed_incentive: row.try_get("fixed_incentive")?,
            employer_incentive: row.try_get("employer_incentive")?,
            pf_employee: rate("pf_employee")?,
            pf_employer: rate("pf_employer")?,
            esi: rate("esi")?,
            lwf: rate("lwf")?,
            ex_gratia: rate("ex_gratia")?,
            late_penalty_per_minute: row.try_get("late_penalty_per_minute")?,
            is_active: row.try_get("is_active")?,
        })
    }
}
