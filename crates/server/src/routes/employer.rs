use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    db::models::{Job, JobApplication, JobStatus},
    error::Result,
    middleware::auth::AuthUser,
    routes::jobs::{JobListResponse, JobsQuery},
    services::{
        jobs::{self, JobFormData, JobPatch},
        review::{self, StatusSummary},
    },
    AppState,
};

/// Job management for the employer who posted them.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(my_jobs).post(create_job))
        .route(
            "/jobs/:id",
            get(get_job).patch(edit_job).delete(delete_job),
        )
        .route("/jobs/:id/status", put(set_status))
        .route("/jobs/:id/applications", get(job_applications))
        .route("/jobs/:id/applications/summary", get(application_summary))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: JobStatus,
}

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<JobApplication>,
}

async fn my_jobs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<JobsQuery>,
) -> Result<Json<JobListResponse>> {
    user.require_employer()?;

    let mut filter = query.into_filter(None);
    filter.employer_id = Some(user.id);
    let jobs = jobs::list_jobs(&state.db, &filter).await?;
    Ok(Json(JobListResponse { jobs }))
}

async fn create_job(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<JobFormData>,
) -> Result<Json<Job>> {
    user.require_employer()?;

    let job = jobs::create_job(&state.db, &user.id, body, Utc::now().date_naive()).await?;
    Ok(Json(job))
}

async fn get_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Job>> {
    let job = jobs::owned_job(&state.db, &user.id, &id).await?;
    Ok(Json(job))
}

async fn edit_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<JobPatch>,
) -> Result<Json<Job>> {
    let job = jobs::edit_job(&state.db, &user.id, &id, body).await?;
    Ok(Json(job))
}

async fn delete_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<()>> {
    jobs::delete_job(&state.db, &state.storage, &user.id, &id).await?;
    Ok(Json(()))
}

async fn set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Job>> {
    let job = jobs::set_job_status(&state.db, &user.id, &id, body.status).await?;
    Ok(Json(job))
}

async fn job_applications(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApplicationListResponse>> {
    let applications = review::applications_for_job(&state.db, &user.id, &id).await?;
    Ok(Json(ApplicationListResponse { applications }))
}

async fn application_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StatusSummary>> {
    let summary = review::status_summary(&state.db, &user.id, &id).await?;
    Ok(Json(summary))
}
