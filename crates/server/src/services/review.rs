//! Employer-side review of submitted applications.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    jobs::{owned_job, present},
    storage::StorageService,
    workflow,
};
use crate::{
    db::{
        models::{ApplicationStatus, JobApplication, Profile},
        repository::{
            ApplicationRepository, JobRepository, ProfileRepository, Store, UserRepository,
        },
    },
    error::{AppError, Result},
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub profile: Option<Profile>,
}

/// An application merged with its job and applicant, as shown on the
/// review page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReview {
    #[serde(flatten)]
    pub application: JobApplication,
    pub job_title: String,
    pub company: String,
    pub applicant: ApplicantSummary,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentUpdate {
    /// `Some(None)` clears the score; `None` keeps it.
    #[serde(deserialize_with = "present")]
    pub match_score: Option<Option<i32>>,
    pub interview_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: i64,
    pub pending: i64,
    pub reviewing: i64,
    pub accepted: i64,
    pub rejected: i64,
}

fn not_found() -> AppError {
    AppError::NotFound("Application not found".to_string())
}

async fn fetch<S>(store: &S, id: &str) -> Result<JobApplication>
where
    S: Store + ?Sized,
{
    store.fetch_application(id).await?.ok_or_else(not_found)
}

/// Loads an application for the employer who posted its job.
async fn employer_application<S>(
    store: &S,
    employer_id: &str,
    id: &str,
) -> Result<JobApplication>
where
    S: Store + ?Sized,
{
    let application = fetch(store, id).await?;
    owned_job(store, employer_id, &application.job_id).await?;
    Ok(application)
}

async fn persist<S>(store: &S, application: &JobApplication) -> Result<()>
where
    S: Store + ?Sized,
{
    if !store.update_application(application).await? {
        return Err(not_found());
    }
    Ok(())
}

/// The review page. Visible to the job's employer and to the applicant.
pub async fn load_application<S>(store: &S, viewer_id: &str, id: &str) -> Result<ApplicationReview>
where
    S: Store + ?Sized,
{
    let application = fetch(store, id).await?;
    let job = store
        .fetch_job(&application.job_id)
        .await?
        .ok_or_else(not_found)?;

    if viewer_id != job.employer_id && viewer_id != application.applicant_id {
        return Err(AppError::Forbidden(
            "You cannot view this application".to_string(),
        ));
    }

    let applicant = store
        .find_user(&application.applicant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Applicant not found".to_string()))?;
    let profile = store.profile_for_user(&applicant.id).await?;

    Ok(ApplicationReview {
        application,
        job_title: job.title,
        company: job.company,
        applicant: ApplicantSummary {
            id: applicant.id,
            full_name: applicant.full_name,
            email: applicant.email,
            profile,
        },
    })
}

/// Stores the employer's notes. Blank text clears them.
pub async fn save_notes<S>(store: &S, employer_id: &str, id: &str, text: &str) -> Result<JobApplication>
where
    S: Store + ?Sized,
{
    let mut application = employer_application(store, employer_id, id).await?;
    application.notes = Some(text.to_string()).filter(|t| !t.trim().is_empty());
    application.updated_at = Utc::now();
    persist(store, &application).await?;
    Ok(application)
}

pub async fn change_status<S>(
    store: &S,
    employer_id: &str,
    id: &str,
    status: ApplicationStatus,
    today: NaiveDate,
) -> Result<JobApplication>
where
    S: Store + ?Sized,
{
    let mut application = employer_application(store, employer_id, id).await?;
    workflow::set_status(&mut application, status, today);
    persist(store, &application).await?;
    Ok(application)
}

pub async fn update_assessment<S>(
    store: &S,
    employer_id: &str,
    id: &str,
    update: AssessmentUpdate,
) -> Result<JobApplication>
where
    S: Store + ?Sized,
{
    if let Some(Some(score)) = update.match_score {
        if !(0..=100).contains(&score) {
            return Err(AppError::Validation(
                "Match score must be between 0 and 100".to_string(),
            ));
        }
    }

    let mut application = employer_application(store, employer_id, id).await?;
    if let Some(score) = update.match_score {
        application.match_score = score;
    }
    if let Some(date) = update.interview_date {
        application.interview_date = Some(date).filter(|d| !d.trim().is_empty());
    }
    application.updated_at = Utc::now();
    persist(store, &application).await?;
    Ok(application)
}

pub async fn applications_for_job<S>(
    store: &S,
    employer_id: &str,
    job_id: &str,
) -> Result<Vec<JobApplication>>
where
    S: Store + ?Sized,
{
    owned_job(store, employer_id, job_id).await?;
    Ok(store.list_for_job(job_id).await?)
}

pub async fn status_summary<S>(store: &S, employer_id: &str, job_id: &str) -> Result<StatusSummary>
where
    S: Store + ?Sized,
{
    owned_job(store, employer_id, job_id).await?;

    let mut summary = StatusSummary::default();
    for (status, count) in store.count_by_status(job_id).await? {
        summary.total += count;
        match status {
            ApplicationStatus::Pending => summary.pending = count,
            ApplicationStatus::Reviewing => summary.reviewing = count,
            ApplicationStatus::Accepted => summary.accepted = count,
            ApplicationStatus::Rejected => summary.rejected = count,
        }
    }
    Ok(summary)
}

/// A stored resume, ready to be sent back to the browser.
#[derive(Debug)]
pub struct ResumeDownload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub async fn resume<S>(
    store: &S,
    storage: &StorageService,
    viewer_id: &str,
    id: &str,
) -> Result<ResumeDownload>
where
    S: Store + ?Sized,
{
    let review = load_application(store, viewer_id, id).await?;
    let file_name = review
        .application
        .resume_file_name
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    let bytes = storage.read_resume(id, &file_name).await?;
    Ok(ResumeDownload {
        file_name,
        content_type: review
            .application
            .resume_content_type
            .unwrap_or_else(|| "application/octet-stream".to_string()),
        bytes,
    })
}
