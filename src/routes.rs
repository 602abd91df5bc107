use crate::{api::payroll, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    // compute runs are heavy; everything else shares the default limit
    let compute_limiter = Arc::new(build_limiter(config.rate_compute_per_min));
    let default_limiter = Arc::new(build_limiter(config.rate_default_per_min));

    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/payroll")
                // /payroll/compute
                .service(
                    web::resource("/compute")
                        .wrap(compute_limiter.clone())
                        .route(web::post().to(payroll::compute_payroll)),
                )
                // /payroll
                .service(
                    web::resource("")
                        .wrap(default_limiter.clone())
                        .route(web::get().to(payroll::list_payrolls)),
                )
                // /payroll/{id}
                .service(
                    web::resource("/{id}")
                        .wrap(default_limiter.clone())
                        .route(web::get().to(payroll::get_payroll)),
                )
                // /payroll/{id}/lock
                .service(
                    web::resource("/{id}/lock")
                        .wrap(default_limiter.clone())
                        .route(web::put().to(payroll::lock_payroll)),
                )
                // /payroll/{id}/unlock
                .service(
                    web::resource("/{id}/unlock")
                        .wrap(default_limiter.clone())
                        .route(web::put().to(payroll::unlock_payroll)),
                )
                // /payroll/{id}/approve
                .service(
                    web::resource("/{id}/approve")
                        .wrap(default_limiter.clone())
                        .route(web::put().to(payroll::approve_payroll)),
                )
                // /payroll/{id}/mark-paid
                .service(
                    web::resource("/{id}/mark-paid")
                        .wrap(default_limiter)
                        .route(web::put().to(payroll::mark_paid)),
                ),
        ),
    );
}

// COMPUTE
//  ├─ POST /payroll/compute { month, employee_id? }
//  └─ one PayrollResult per employee, action = created|updated|skipped_locked
//
// WORKFLOW
//  └─ lock → approve → mark-paid (lock freezes the record for the engine)
