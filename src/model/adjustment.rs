use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
    sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AdjustmentType {
    Bonus,
    Incentive,
    Reimbursement,
    Allowance,
    Penalty,
    Deduction,
    PenaltyWaiver,
}

impl AdjustmentType {
    /// Additive kinds raise net salary; every other kind lowers it.
    /// Waivers never alter totals directly.
    pub fn is_additive(&self) -> bool {
        matches!(
            self,
            AdjustmentType::Bonus
                | AdjustmentType::Incentive
                | AdjustmentType::Reimbursement
                | AdjustmentType::Allowance
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
    sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AdjustmentStatus {
    Pending,
    Approved,
    Rejected,
}

/// Ad-hoc salary adjustment for one employee and month. Only `approved`
/// records participate in computation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AdjustmentRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-01")]
    pub month: String,

    #[schema(example = "bonus", value_type = String)]
    pub kind: AdjustmentType,

    #[schema(example = 1500.0)]
    pub amount: f64,

    #[schema(example = "approved", value_type = String)]
    pub status: AdjustmentStatus,

    /// `YYYY-MM-DD`; waivers are matched against penalized dates by this value
    #[schema(example = "2026-01-05")]
    pub date: String,

    #[schema(example = "Quarterly performance bonus", nullable = true)]
    pub reason: Option<String>,
}
