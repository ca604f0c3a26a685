use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use super::{
    storage::StorageService,
    wizard::{ApplicationForm, ApplicationWizard, ValidatedApplication},
};
use crate::{
    db::{
        models::{ApplicationStatus, JobApplication, JobStatus, Profile},
        repository::{ApplicationRepository, JobRepository, ProfileRepository, Store},
    },
    error::{AppError, Result},
};

/// Runs a completed wizard form to submission: validates it, stores the
/// resume, refreshes the applicant's profile and records a `Pending`
/// application dated `today`.
pub async fn submit_application<S>(
    store: &S,
    storage: &StorageService,
    job_id: &str,
    applicant_id: &str,
    form: ApplicationForm,
    resume_bytes: Vec<u8>,
    today: NaiveDate,
) -> Result<JobApplication>
where
    S: Store + ?Sized,
{
    let validated = ApplicationWizard::complete(form)?;

    let job = store
        .fetch_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    if job.status != JobStatus::Active {
        return Err(AppError::Validation(
            "This job is no longer accepting applications".to_string(),
        ));
    }

    if store.find_application(job_id, applicant_id).await?.is_some() {
        return Err(AppError::Conflict(
            "You have already applied for this job".to_string(),
        ));
    }

    let application_id = Uuid::new_v4().to_string();
    let resume_url = storage
        .save_resume(&application_id, &validated.resume.file_name, &resume_bytes)
        .await?;

    let result = record_submission(
        store,
        &application_id,
        job_id,
        applicant_id,
        validated,
        resume_url,
        today,
    )
    .await;

    match result {
        Ok(application) => {
            tracing::info!(
                application_id = %application.id,
                job_id,
                applicant_id,
                "application submitted"
            );
            Ok(application)
        }
        Err(err) => {
            tracing::error!(job_id, applicant_id, "application submission failed: {err}");
            if let Err(cleanup) = storage.delete_application(&application_id).await {
                tracing::warn!("failed to remove orphaned resume: {cleanup}");
            }
            Err(err)
        }
    }
}

async fn record_submission<S>(
    store: &S,
    application_id: &str,
    job_id: &str,
    applicant_id: &str,
    validated: ValidatedApplication,
    resume_url: String,
    today: NaiveDate,
) -> Result<JobApplication>
where
    S: Store + ?Sized,
{
    let file_name = StorageService::sanitize_file_name(&validated.resume.file_name);
    let now = Utc::now();

    let existing = store.profile_for_user(applicant_id).await?;
    let mut profile = existing.unwrap_or_else(|| Profile {
        id: Uuid::new_v4().to_string(),
        user_id: applicant_id.to_string(),
        first_name: None,
        last_name: None,
        phone: None,
        current_role: None,
        experience: None,
        skills: Json(Vec::new()),
        notice_period: None,
        expected_salary: None,
        resume_url: None,
        resume_file_name: None,
        cover_letter_url: None,
        preferred_work_type: None,
        willing_to_relocate: false,
        about: None,
        profile_picture: None,
        location: None,
        created_at: now,
        updated_at: now,
    });
    profile.first_name = Some(validated.first_name);
    profile.last_name = Some(validated.last_name);
    profile.phone = Some(validated.phone);
    profile.current_role = Some(validated.current_role);
    profile.experience = Some(validated.experience);
    profile.skills = Json(validated.skills);
    profile.notice_period = Some(validated.notice_period);
    profile.expected_salary = Some(validated.expected_salary);
    profile.resume_url = Some(resume_url.clone());
    profile.resume_file_name = Some(file_name.clone());
    profile.preferred_work_type = Some(validated.work_type);
    profile.updated_at = now;

    let application = JobApplication {
        id: application_id.to_string(),
        job_id: job_id.to_string(),
        applicant_id: applicant_id.to_string(),
        applied_date: today,
        status: ApplicationStatus::Pending,
        status_update_date: None,
        notes: None,
        match_score: None,
        interview_date: None,
        resume_url: Some(resume_url),
        resume_file_name: Some(file_name),
        resume_content_type: Some(validated.resume.content_type),
        cover_letter: validated.cover_letter,
        created_at: now,
        updated_at: now,
    };
    store.record_application(&application, &profile).await?;

    Ok(application)
}

pub async fn applications_for_applicant<S>(store: &S, applicant_id: &str) -> Result<Vec<JobApplication>>
where
    S: Store + ?Sized,
{
    Ok(store.list_for_applicant(applicant_id).await?)
}
