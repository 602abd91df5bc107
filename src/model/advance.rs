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
pub enum AdvanceStatus {
    Active,
    Closed,
}

/// Outstanding salary advance, recovered one installment per month starting
/// from `recovery_start_month`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AdvanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 2000.0)]
    pub installment_amount: f64,

    #[schema(example = 6000.0)]
    pub remaining_balance: f64,

    /// Fixed-width `YYYY-MM`; compared lexically against the target month
    #[schema(example = "2026-01")]
    pub recovery_start_month: String,

    #[schema(example = "active", value_type = String)]
    pub status: AdvanceStatus,
}
