use axum::routing::get;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/jobs", job_routes())
        .route("/jobs/", get(handlers::job::missing_job_id))
        .nest("/hooks", hook_routes())
        .nest("/worker", worker_routes())
}

fn job_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::job::submit_job))
        .routes(routes!(handlers::job::get_job))
        .route("/", get(handlers::job::missing_job_id))
}

fn hook_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::hook::receive_job_status))
}

fn worker_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::worker::run_worker))
}
