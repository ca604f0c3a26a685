use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::{
    db::models::Job,
    error::Result,
    middleware::auth::AuthUser,
    services::profiles,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favourites))
        .route("/:job_id", get(favourite_state).post(toggle_favourite))
}

#[derive(Debug, Serialize)]
pub struct FavouritesResponse {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub job_id: String,
    pub saved: bool,
}

async fn list_favourites(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<FavouritesResponse>> {
    let jobs = profiles::favourite_jobs(&state.db, &user.id).await?;
    Ok(Json(FavouritesResponse { jobs }))
}

async fn favourite_state(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> Result<Json<ToggleResponse>> {
    let saved = profiles::is_favourite(&state.db, &user.id, &job_id).await?;
    Ok(Json(ToggleResponse { job_id, saved }))
}

async fn toggle_favourite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> Result<Json<ToggleResponse>> {
    let saved = profiles::toggle_favourite(&state.db, &user.id, &job_id).await?;
    Ok(Json(ToggleResponse { job_id, saved }))
}
