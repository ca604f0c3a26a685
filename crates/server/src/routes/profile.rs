use axum::{extract::State, routing::get, Json, Router};

use crate::{
    db::models::Profile,
    error::Result,
    middleware::auth::AuthUser,
    services::profiles::{self, ProfileInput},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(save_profile))
}

async fn get_profile(State(state): State<AppState>, user: AuthUser) -> Result<Json<Profile>> {
    let profile = profiles::get_profile(&state.db, &user.id).await?;
    Ok(Json(profile))
}

async fn save_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<ProfileInput>,
) -> Result<Json<Profile>> {
    let profile = profiles::save_profile(&state.db, &user.id, body).await?;
    Ok(Json(profile))
}
