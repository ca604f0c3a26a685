use chrono::Utc;
use serde::Deserialize;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    db::{
        models::{Job, Profile, WorkType},
        repository::{FavouriteRepository, JobRepository, ProfileRepository, RepositoryError, Store},
    },
    error::{AppError, Result},
};

/// Everything a seeker can edit on their profile page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub current_role: Option<String>,
    pub experience: Option<String>,
    pub skills: Vec<String>,
    pub notice_period: Option<String>,
    pub expected_salary: Option<String>,
    pub resume_url: Option<String>,
    pub resume_file_name: Option<String>,
    pub cover_letter_url: Option<String>,
    pub preferred_work_type: Option<WorkType>,
    pub willing_to_relocate: bool,
    pub about: Option<String>,
    pub profile_picture: Option<String>,
    pub location: Option<String>,
}

pub async fn get_profile<S>(store: &S, user_id: &str) -> Result<Profile>
where
    S: Store + ?Sized,
{
    store
        .profile_for_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

pub async fn save_profile<S>(store: &S, user_id: &str, input: ProfileInput) -> Result<Profile>
where
    S: Store + ?Sized,
{
    let skills = input
        .skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let now = Utc::now();
    let profile = Profile {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        first_name: input.first_name,
        last_name: input.last_name,
        phone: input.phone,
        current_role: input.current_role,
        experience: input.experience,
        skills: Json(skills),
        notice_period: input.notice_period,
        expected_salary: input.expected_salary,
        resume_url: input.resume_url,
        resume_file_name: input.resume_file_name,
        cover_letter_url: input.cover_letter_url,
        preferred_work_type: input.preferred_work_type,
        willing_to_relocate: input.willing_to_relocate,
        about: input.about,
        profile_picture: input.profile_picture,
        location: input.location,
        created_at: now,
        updated_at: now,
    };

    Ok(store.upsert_profile(&profile).await?)
}

/// Saves the job if it is not saved yet, unsaves it otherwise. Returns
/// whether the job is saved afterwards.
pub async fn toggle_favourite<S>(store: &S, user_id: &str, job_id: &str) -> Result<bool>
where
    S: Store + ?Sized,
{
    if store.fetch_job(job_id).await?.is_none() {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    if store.delete_favourite(user_id, job_id).await? {
        return Ok(false);
    }

    match store.insert_favourite(user_id, job_id).await {
        // a concurrent toggle saved it first
        Ok(()) | Err(RepositoryError::Conflict(_)) => Ok(true),
        Err(err) => Err(err.into()),
    }
}

pub async fn is_favourite<S>(store: &S, user_id: &str, job_id: &str) -> Result<bool>
where
    S: Store + ?Sized,
{
    Ok(store.is_favourite(user_id, job_id).await?)
}

pub async fn favourite_jobs<S>(store: &S, user_id: &str) -> Result<Vec<Job>>
where
    S: Store + ?Sized,
{
    Ok(store.favourite_jobs(user_id).await?)
}
