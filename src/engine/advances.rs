use crate::model::advance::{AdvanceRecord, AdvanceStatus};

/// Installments due this month, one per qualifying advance, each capped by
/// its remaining balance. The month comparison is lexical, valid because
/// both sides are fixed-width `YYYY-MM`.
pub fn installments_due(advances: &[&AdvanceRecord], month: &str) -> Vec<(u64, f64)> {
    advances
        .iter()
        .filter(|a| {
            a.status == AdvanceStatus::Active
                && a.recovery_start_month.as_str() <= month
                && a.remaining_balance > 0.0
        })
        .map(|a| (a.id, a.installment_amount.min(a.remaining_balance)))
        .collect()
}

/// Total advance recovery to withhold this month.
pub fn recovery_due(advances: &[&AdvanceRecord], month: &str) -> f64 {
    installments_due(advances, month)
        .iter()
        .map(|(_, amount)| amount)
        .sum()
}
