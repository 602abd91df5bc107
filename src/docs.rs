use crate::api::payroll::{
    ComputeRequest, ComputeResponse, PaginatedPayrollResponse, PayrollQuery, PayrollResult,
};
use crate::engine::result::{PayrollComputation, TimingAdjustment};
use crate::model::adjustment::{AdjustmentRecord, AdjustmentStatus, AdjustmentType};
use crate::model::advance::{AdvanceRecord, AdvanceStatus};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::payroll::{PayrollRecord, PayrollStatus};
use crate::model::policy::{CompensationPolicy, StatutoryRate};
use crate::model::task::{TaskAssignment, TimesheetEntry};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Engine API",
        version = "1.0.0",
        description = r#"
## Monthly Payroll Computation Engine

The single authoritative payroll computation for the operations suite.
One invocation derives each employee's salary for a calendar month from
attendance records, the active compensation policy, ad-hoc adjustments and
outstanding salary advances.

### Key Features
- **Compute** — per-month, optionally per-employee; one persisted record per
  (employee, month), with `created` / `updated` / `skipped_locked` per result
- **Attendance-driven pay** — status buckets, first-absence-paid, tiered
  check-in/check-out deductions, timesheet-compliance penalties
- **Statutory deductions** — PF / ESI / LWF / ex-gratia as percentage or
  pro-rated fixed amounts
- **Workflow** — lock/unlock, approve, mark-paid (settles advance balances)

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payroll::compute_payroll,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::get_payroll,
        crate::api::payroll::lock_payroll,
        crate::api::payroll::unlock_payroll,
        crate::api::payroll::approve_payroll,
        crate::api::payroll::mark_paid
    ),
    components(
        schemas(
            ComputeRequest,
            ComputeResponse,
            PayrollResult,
            PayrollQuery,
            PaginatedPayrollResponse,
            PayrollComputation,
            TimingAdjustment,
            PayrollRecord,
            PayrollStatus,
            Employee,
            AttendanceRecord,
            AttendanceStatus,
            CompensationPolicy,
            StatutoryRate,
            AdjustmentRecord,
            AdjustmentType,
            AdjustmentStatus,
            AdvanceRecord,
            AdvanceStatus,
            TaskAssignment,
            TimesheetEntry
        )
    ),
    tags(
        (name = "Payroll", description = "Payroll computation and workflow APIs"),
    )
)]
pub struct ApiDoc;
