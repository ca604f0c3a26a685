use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::{
        models::{Job, JobStatus},
        repository::JobFilter,
    },
    error::{AppError, Result},
    services::jobs,
    AppState,
};

/// Public job board: anyone can browse and open listings.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs))
        .route("/:id", get(get_job))
}

#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    pub status: Option<JobStatus>,
    pub q: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
}

impl JobsQuery {
    pub fn into_filter(self, default_status: Option<JobStatus>) -> JobFilter {
        JobFilter {
            status: self.status.or(default_status),
            employer_id: None,
            search: self.q,
            location: self.location,
            job_type: self.job_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
}

async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<JobListResponse>> {
    // Drafts are only visible to their employer
    if query.status == Some(JobStatus::Draft) {
        return Ok(Json(JobListResponse { jobs: Vec::new() }));
    }

    let filter = query.into_filter(Some(JobStatus::Active));
    let jobs = jobs::list_jobs(&state.db, &filter).await?;
    Ok(Json(JobListResponse { jobs }))
}

async fn get_job(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Job>> {
    let job = jobs::get_job(&state.db, &id).await?;
    if job.status == JobStatus::Draft {
        return Err(AppError::NotFound("Job not found".to_string()));
    }
    Ok(Json(job))
}
