use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::engine::result::PayrollComputation;
use crate::engine::{self, ComputeInputs, Month};
use crate::model::payroll::PayrollRecord;
use crate::store::{self, PayrollListFilter};

/// Per-invocation fan-out width across employees. The computation itself is
/// pure; only the upserts hit the pool.
const COMPUTE_CONCURRENCY: usize = 8;

#[derive(Deserialize, ToSchema)]
pub struct ComputeRequest {
    #[schema(example = "2026-01")]
    pub month: String,

    /// Restrict the run to one employee
    #[schema(example = 1001, nullable = true)]
    pub employee_id: Option<u64>,

    /// Who triggered the run; recorded on the computed records
    #[schema(example = 7, nullable = true)]
    pub actor_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollResult {
    #[schema(example = "Jane Doe", nullable = true)]
    pub employee_name: Option<String>,

    #[schema(example = "updated")]
    pub action: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(nullable = true)]
    pub error: Option<String>,

    #[serde(flatten)]
    pub computation: PayrollComputation,
}

#[derive(Serialize, ToSchema)]
pub struct ComputeResponse {
    pub results: Vec<PayrollResult>,
    #[schema(example = 12)]
    pub total_processed: usize,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u64>,

    #[schema(example = 10)]
    pub per_page: Option<u64>,

    #[schema(example = "2026-01")]
    pub month: Option<String>,

    #[schema(example = 1001)]
    pub employee_id: Option<u64>,

    #[schema(example = "draft")]
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<PayrollRecord>,
    pub page: u64,
    pub per_page: u64,
    pub total: i64,
}

/// Runs the payroll engine for a month, persisting one record per employee.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/compute",
    request_body = ComputeRequest,
    responses(
        (status = 200, description = "Computation finished", body = ComputeResponse),
        (status = 400, description = "Invalid month", body = Object, example = json!({
            "message": "invalid month '2026-1', expected YYYY-MM"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn compute_payroll(
    pool: web::Data<MySqlPool>,
    payload: web::Json<ComputeRequest>,
) -> actix_web::Result<impl Responder> {
    // validate before touching storage
    let month = match Month::parse(payload.month.trim()) {
        Ok(m) => m,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": e.to_string()
            })));
        }
    };

    let run_id = Uuid::new_v4();
    tracing::info!(
        %run_id,
        month = %month.key,
        employee_id = ?payload.employee_id,
        actor_id = ?payload.actor_id,
        "Payroll computation started"
    );

    let inputs = store::load_month_inputs(pool.get_ref(), &month, payload.employee_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, %run_id, "Failed to load payroll inputs");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // an explicit employee filter computes even without a directory row;
    // a full run covers every employee in the directory
    let targets: Vec<(u64, Option<String>)> = match payload.employee_id {
        Some(id) => vec![(
            id,
            inputs
                .employees
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.display_name()),
        )],
        None => inputs
            .employees
            .iter()
            .map(|e| (e.id, Some(e.display_name())))
            .collect(),
    };

    let compute_inputs = ComputeInputs {
        policies: &inputs.policies,
        attendance: &inputs.attendance,
        adjustments: &inputs.adjustments,
        advances: &inputs.advances,
        tasks: &inputs.tasks,
        timesheets: &inputs.timesheets,
    };
    let as_of = Utc::now();
    let actor_id = payload.actor_id;
    let db = pool.get_ref();
    let month_ref = &month;
    let inputs_ref = &compute_inputs;

    let mut results: Vec<PayrollResult> = futures::stream::iter(targets)
        .map(|(employee_id, employee_name)| async move {
            let computation = engine::compute_employee(employee_id, month_ref, inputs_ref, as_of);
            match store::upsert_payroll(db, &computation, actor_id).await {
                Ok(action) => PayrollResult {
                    employee_name,
                    action: action.to_string(),
                    error: None,
                    computation,
                },
                // one employee's persistence failure never aborts the batch
                Err(e) => {
                    tracing::error!(error = %e, employee_id, "Payroll upsert failed");
                    PayrollResult {
                        employee_name,
                        action: "error".to_string(),
                        error: Some("Failed to persist payroll record".to_string()),
                        computation,
                    }
                }
            }
        })
        .buffer_unordered(COMPUTE_CONCURRENCY)
        .collect()
        .await;

    results.sort_by_key(|r| r.computation.employee_id);
    let total_processed = results.iter().filter(|r| r.error.is_none()).count();

    tracing::info!(
        %run_id,
        month = %month.key,
        total_processed,
        total_results = results.len(),
        "Payroll computation finished"
    );

    Ok(HttpResponse::Ok().json(ComputeResponse {
        results,
        total_processed,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, description = "Paginated payroll list", body = PaginatedPayrollResponse)
    ),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    pool: web::Data<MySqlPool>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    let filter = PayrollListFilter {
        month: query.month.clone(),
        employee_id: query.employee_id,
        status: query.status.clone(),
    };

    let (data, total) = store::list_payrolls(pool.get_ref(), &filter, page, per_page)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch payroll list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data,
        page,
        per_page,
        total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, body = PayrollRecord),
        (status = 404, description = "Payroll record not found")
    ),
    tag = "Payroll"
)]
pub async fn get_payroll(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let payroll_id = path.into_inner();

    let record = store::get_payroll(pool.get_ref(), payroll_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to fetch payroll record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match record {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Payroll record not found"
        }))),
    }
}

/// Freezes a record; the engine skips it on every later run.
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}/lock",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, description = "Payroll locked", body = Object, example = json!({
            "message": "Payroll locked"
        })),
        (status = 400, description = "Not found or already locked")
    ),
    tag = "Payroll"
)]
pub async fn lock_payroll(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let payroll_id = path.into_inner();

    let rows = store::lock_payroll(pool.get_ref(), payroll_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Lock payroll failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if rows == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Payroll record not found or already locked"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payroll locked"
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}/unlock",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, description = "Payroll unlocked", body = Object, example = json!({
            "message": "Payroll unlocked"
        })),
        (status = 400, description = "Not found or not locked")
    ),
    tag = "Payroll"
)]
pub async fn unlock_payroll(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let payroll_id = path.into_inner();

    let rows = store::unlock_payroll(pool.get_ref(), payroll_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Unlock payroll failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if rows == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Payroll record not found or not locked"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payroll unlocked"
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}/approve",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, description = "Payroll approved", body = Object, example = json!({
            "message": "Payroll approved"
        })),
        (status = 400, description = "Not found or already processed")
    ),
    tag = "Payroll"
)]
pub async fn approve_payroll(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let payroll_id = path.into_inner();

    let rows = store::approve_payroll(pool.get_ref(), payroll_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Approve payroll failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if rows == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Payroll record not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payroll approved"
    })))
}

/// Marks an approved record as paid and settles the month's advance
/// installments against their balances.
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}/mark-paid",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, description = "Payroll marked as paid", body = Object, example = json!({
            "message": "Payroll marked as paid"
        })),
        (status = 400, description = "Not found or not approved")
    ),
    tag = "Payroll"
)]
pub async fn mark_paid(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let payroll_id = path.into_inner();

    let marked = store::mark_paid(pool.get_ref(), payroll_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Mark paid failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if !marked {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Payroll record not found or not approved"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payroll marked as paid"
    })))
}
