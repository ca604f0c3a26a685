use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    db::models::{ApplicationStatus, JobApplication},
    error::{AppError, Result},
    middleware::auth::AuthUser,
    services::{
        applications,
        review::{self, ApplicationReview, AssessmentUpdate},
        wizard::{ApplicationForm, ApplicationWizard, ResumeInfo, WizardStep},
    },
    AppState,
};

/// Room for a resume just over the size limit plus the text fields, so the
/// wizard can report the size error instead of the transport failing.
const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(my_applications).post(submit_application))
        .route("/:id", get(get_application).patch(update_assessment))
        .route("/:id/status", put(change_status))
        .route("/:id/notes", put(save_notes))
        .route("/:id/resume", get(download_resume))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Step navigation for the application form's "Next" and "Back" buttons.
pub fn wizard_router() -> Router<AppState> {
    Router::new()
        .route("/steps/:step", post(validate_step))
        .route("/steps/:step/back", post(previous_step))
}

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<JobApplication>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct BackResponse {
    pub step: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResponse {
    pub step: usize,
    pub next_step: Option<usize>,
}

fn wizard_at(step: usize, form: ApplicationForm) -> Result<ApplicationWizard> {
    let current = WizardStep::from_index(step)
        .ok_or_else(|| AppError::NotFound(format!("No step {step} in the application form")))?;
    Ok(ApplicationWizard::resume(current, form))
}

async fn validate_step(
    Path(step): Path<usize>,
    Json(form): Json<ApplicationForm>,
) -> Result<Json<StepResponse>> {
    let mut wizard = wizard_at(step, form)?;
    let current = wizard.step();
    let reached = wizard.next()?;

    let next_step = (reached != current).then(|| reached.index());
    Ok(Json(StepResponse { step, next_step }))
}

/// The "Back" button: never validates, stays put on the first step.
async fn previous_step(Path(step): Path<usize>) -> Result<Json<BackResponse>> {
    let mut wizard = wizard_at(step, ApplicationForm::default())?;
    let step = wizard.back().index();
    Ok(Json(BackResponse { step }))
}

fn form_error(err: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("Invalid form data: {err}"))
}

/// Reads the multipart body posted by the application form: the job id,
/// the wizard's text fields and the `resume` file.
async fn read_submission(mut multipart: Multipart) -> Result<(String, ApplicationForm, Vec<u8>)> {
    let mut job_id = None;
    let mut form = ApplicationForm::default();
    let mut resume_bytes = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "resume" {
            let file_name = field.file_name().unwrap_or("resume").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(form_error)?;
            // browsers send an empty part when no file was picked
            if bytes.is_empty() {
                continue;
            }
            form.resume = Some(ResumeInfo {
                file_name,
                size: bytes.len() as u64,
                content_type,
            });
            resume_bytes = bytes.to_vec();
            continue;
        }

        let value = field.text().await.map_err(form_error)?;
        match name.as_str() {
            "jobId" => job_id = Some(value),
            "firstName" => form.first_name = value,
            "lastName" => form.last_name = value,
            "email" => form.email = value,
            "phone" => form.phone = value,
            "currentRole" => form.current_role = value,
            "experience" => form.experience = value,
            "skills" => form.skills = value,
            "coverLetter" => form.cover_letter = Some(value),
            "noticePeriod" => form.notice_period = value,
            "expectedSalary" => form.expected_salary = value,
            "workType" => form.work_type = value,
            "termsAccepted" => form.terms_accepted = matches!(value.as_str(), "true" | "on" | "1"),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    let job_id = job_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation("jobId is required".to_string()))?;

    Ok((job_id, form, resume_bytes))
}

async fn submit_application(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<JobApplication>> {
    user.require_job_seeker()?;

    let (job_id, form, resume_bytes) = read_submission(multipart).await?;
    let application = applications::submit_application(
        &state.db,
        &state.storage,
        &job_id,
        &user.id,
        form,
        resume_bytes,
        Utc::now().date_naive(),
    )
    .await?;

    Ok(Json(application))
}

async fn my_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApplicationListResponse>> {
    let applications = applications::applications_for_applicant(&state.db, &user.id).await?;
    Ok(Json(ApplicationListResponse { applications }))
}

async fn get_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApplicationReview>> {
    let review = review::load_application(&state.db, &user.id, &id).await?;
    Ok(Json(review))
}

async fn change_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<JobApplication>> {
    let application = review::change_status(
        &state.db,
        &user.id,
        &id,
        body.status,
        Utc::now().date_naive(),
    )
    .await?;
    Ok(Json(application))
}

async fn save_notes(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<NotesRequest>,
) -> Result<Json<JobApplication>> {
    let application = review::save_notes(&state.db, &user.id, &id, &body.notes).await?;
    Ok(Json(application))
}

async fn update_assessment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<AssessmentUpdate>,
) -> Result<Json<JobApplication>> {
    let application = review::update_assessment(&state.db, &user.id, &id, body).await?;
    Ok(Json(application))
}

async fn download_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let resume = review::resume(&state.db, &state.storage, &user.id, &id).await?;
    let disposition = format!("attachment; filename=\"{}\"", resume.file_name.replace('"', ""));

    Ok((
        [
            (header::CONTENT_TYPE, resume.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        resume.bytes,
    )
        .into_response())
}
