use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::{
    db::{
        models::{Job, JobStatus},
        repository::{ApplicationRepository, JobFilter, JobRepository},
    },
    error::{AppError, Result},
};

use super::storage::StorageService;

/// Fields an employer fills in when posting a job. Id, posting date and
/// status are assigned by [`create_job`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFormData {
    pub title: String,
    pub company: String,
    pub logo: Option<String>,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary: String,
    pub experience: String,
    pub description: String,
    pub responsibilities: String,
    pub requirements: String,
    pub benefits: String,
    pub company_description: String,
}

/// Partial update merged over an existing job. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    /// `Some(None)` clears the logo; `None` keeps it.
    #[serde(deserialize_with = "present")]
    pub logo: Option<Option<String>>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub experience: Option<String>,
    pub status: Option<JobStatus>,
    pub description: Option<String>,
    pub responsibilities: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub company_description: Option<String>,
}

// Only called when the key is present, so an explicit null becomes Some(None)
pub(crate) fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn normalize_logo(logo: Option<String>) -> Option<String> {
    logo.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())
}

fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

impl JobFormData {
    fn validate(&self) -> Result<()> {
        require(&self.title, "Job title is required")?;
        require(&self.company, "Company name is required")?;
        require(&self.location, "Location is required")
    }
}

impl JobPatch {
    fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require(title, "Job title is required")?;
        }
        if let Some(company) = &self.company {
            require(company, "Company name is required")?;
        }
        if let Some(location) = &self.location {
            require(location, "Location is required")?;
        }
        Ok(())
    }

    /// Shallow merge over `job`.
    pub fn apply(self, job: &mut Job) {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut job.title, self.title);
        set(&mut job.company, self.company);
        if let Some(logo) = self.logo {
            job.logo = normalize_logo(logo);
        }
        set(&mut job.location, self.location);
        set(&mut job.job_type, self.job_type);
        set(&mut job.salary, self.salary);
        set(&mut job.experience, self.experience);
        set(&mut job.status, self.status);
        set(&mut job.description, self.description);
        set(&mut job.responsibilities, self.responsibilities);
        set(&mut job.requirements, self.requirements);
        set(&mut job.benefits, self.benefits);
        set(&mut job.company_description, self.company_description);
    }
}

pub async fn create_job<R>(
    repo: &R,
    employer_id: &str,
    form: JobFormData,
    today: NaiveDate,
) -> Result<Job>
where
    R: JobRepository + ?Sized,
{
    form.validate()?;

    let now = Utc::now();
    let job = Job {
        id: Uuid::new_v4().to_string(),
        title: form.title,
        company: form.company,
        logo: normalize_logo(form.logo),
        location: form.location,
        job_type: form.job_type,
        salary: form.salary,
        experience: form.experience,
        posted: today,
        status: JobStatus::Active,
        description: form.description,
        responsibilities: form.responsibilities,
        requirements: form.requirements,
        benefits: form.benefits,
        company_description: form.company_description,
        employer_id: employer_id.to_string(),
        created_at: now,
        updated_at: now,
    };

    repo.insert_job(&job).await?;
    tracing::info!(job_id = %job.id, employer_id, "job posted");

    Ok(job)
}

pub async fn get_job<R>(repo: &R, id: &str) -> Result<Job>
where
    R: JobRepository + ?Sized,
{
    repo.fetch_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
}

/// Loads a job and checks that `employer_id` posted it.
pub async fn owned_job<R>(repo: &R, employer_id: &str, id: &str) -> Result<Job>
where
    R: JobRepository + ?Sized,
{
    let job = get_job(repo, id).await?;
    if job.employer_id != employer_id {
        return Err(AppError::Forbidden(
            "Only the employer who posted this job can manage it".to_string(),
        ));
    }
    Ok(job)
}

pub async fn list_jobs<R>(repo: &R, filter: &JobFilter) -> Result<Vec<Job>>
where
    R: JobRepository + ?Sized,
{
    Ok(repo.list_jobs(filter).await?)
}

pub async fn edit_job<R>(repo: &R, employer_id: &str, id: &str, patch: JobPatch) -> Result<Job>
where
    R: JobRepository + ?Sized,
{
    patch.validate()?;

    let mut job = owned_job(repo, employer_id, id).await?;
    patch.apply(&mut job);
    job.updated_at = Utc::now();

    if !repo.update_job(&job).await? {
        return Err(AppError::NotFound("Job not found".to_string()));
    }
    Ok(job)
}

pub async fn set_job_status<R>(
    repo: &R,
    employer_id: &str,
    id: &str,
    status: JobStatus,
) -> Result<Job>
where
    R: JobRepository + ?Sized,
{
    let patch = JobPatch {
        status: Some(status),
        ..Default::default()
    };
    edit_job(repo, employer_id, id, patch).await
}

/// Deletes the job together with its applications, favourites and the
/// resumes stored for those applications.
pub async fn delete_job<R>(
    repo: &R,
    storage: &StorageService,
    employer_id: &str,
    id: &str,
) -> Result<()>
where
    R: JobRepository + ApplicationRepository + ?Sized,
{
    owned_job(repo, employer_id, id).await?;
    let applications = repo.list_for_job(id).await?;

    if !repo.delete_job(id).await? {
        return Err(AppError::NotFound("Job not found".to_string()));
    }
    for application in &applications {
        if let Err(err) = storage.delete_application(&application.id).await {
            tracing::warn!(application_id = %application.id, "failed to remove resume: {err}");
        }
    }
    tracing::info!(
        job_id = id,
        employer_id,
        applications = applications.len(),
        "job deleted"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        fixtures::{application, date, user},
        models::UserRole,
        repository::UserRepository,
        Database,
    };

    fn form() -> JobFormData {
        JobFormData {
            title: "Frontend Developer".to_string(),
            company: "Acme Inc.".to_string(),
            logo: None,
            location: "New York, NY".to_string(),
            job_type: "Full-time".to_string(),
            salary: "$90,000–$120,000".to_string(),
            experience: "Mid-level".to_string(),
            description: "Build the web client.".to_string(),
            responsibilities: "Ship features.".to_string(),
            requirements: "React, TypeScript.".to_string(),
            benefits: "Health insurance.".to_string(),
            company_description: "Acme makes everything.".to_string(),
        }
    }

    fn storage() -> StorageService {
        StorageService::new(std::env::temp_dir().join(format!("jobboard-jobs-{}", Uuid::new_v4())))
    }

    async fn seeded() -> Database {
        let db = Database::in_memory().await;
        db.insert_user(&user("emp", "emp@example.com", UserRole::Employer))
            .await
            .unwrap();
        db.insert_user(&user("other", "other@example.com", UserRole::Employer))
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn posting_without_logo_yields_active_listing_dated_today() {
        let db = seeded().await;
        let today = date(2026, 10, 16);

        let job = create_job(&db, "emp", form(), today).await.unwrap();
        assert_eq!(job.logo, None);
        assert_eq!(job.status, JobStatus::Active);
        assert_eq!(job.posted, today);

        let stored = get_job(&db, &job.id).await.unwrap();
        assert_eq!(stored.title, "Frontend Developer");
        assert_eq!(stored.company, "Acme Inc.");
        assert_eq!(stored.location, "New York, NY");
        assert_eq!(stored.salary, "$90,000–$120,000");
        assert_eq!(stored.job_type, "Full-time");
        assert_eq!(stored.experience, "Mid-level");
        assert_eq!(stored.description, "Build the web client.");
        assert_eq!(stored.responsibilities, "Ship features.");
        assert_eq!(stored.requirements, "React, TypeScript.");
        assert_eq!(stored.benefits, "Health insurance.");
        assert_eq!(stored.company_description, "Acme makes everything.");
        assert_eq!(stored.logo, None);
    }

    #[tokio::test]
    async fn every_created_job_gets_a_fresh_id() {
        let db = seeded().await;
        let today = date(2026, 10, 16);
        let first = create_job(&db, "emp", form(), today).await.unwrap();
        let second = create_job(&db, "emp", form(), today).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let db = seeded().await;
        let mut form = form();
        form.title = "   ".to_string();
        let err = create_job(&db, "emp", form, date(2026, 10, 16))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn edit_merges_present_fields_and_is_idempotent() {
        let db = seeded().await;
        let job = create_job(&db, "emp", form(), date(2026, 10, 16))
            .await
            .unwrap();

        let patch = JobPatch {
            title: Some("Senior Frontend Developer".to_string()),
            logo: Some(Some("https://cdn.example.com/acme.png".to_string())),
            status: Some(JobStatus::Draft),
            ..Default::default()
        };
        let once = edit_job(&db, "emp", &job.id, patch.clone()).await.unwrap();
        let twice = edit_job(&db, "emp", &job.id, patch).await.unwrap();

        for edited in [&once, &twice] {
            assert_eq!(edited.title, "Senior Frontend Developer");
            assert_eq!(edited.logo.as_deref(), Some("https://cdn.example.com/acme.png"));
            assert_eq!(edited.status, JobStatus::Draft);
            assert_eq!(edited.company, job.company);
            assert_eq!(edited.salary, job.salary);
            assert_eq!(edited.posted, job.posted);
            assert_eq!(edited.employer_id, job.employer_id);
        }
    }

    #[test]
    fn patch_distinguishes_missing_logo_from_null_logo() {
        let missing: JobPatch = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(missing.logo, None);

        let cleared: JobPatch = serde_json::from_str(r#"{"logo":null}"#).unwrap();
        assert_eq!(cleared.logo, Some(None));
    }

    #[tokio::test]
    async fn only_the_owner_can_manage_a_job() {
        let db = seeded().await;
        let job = create_job(&db, "emp", form(), date(2026, 10, 16))
            .await
            .unwrap();

        let err = set_job_status(&db, "other", &job.id, JobStatus::Closed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = delete_job(&db, &storage(), "other", &job.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let closed = set_job_status(&db, "emp", &job.id, JobStatus::Closed)
            .await
            .unwrap();
        assert_eq!(closed.status, JobStatus::Closed);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_job() {
        let db = seeded().await;
        let today = date(2026, 10, 16);
        let keep = create_job(&db, "emp", form(), today).await.unwrap();
        let gone = create_job(&db, "emp", form(), today).await.unwrap();

        let err = delete_job(&db, &storage(), "emp", "missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        delete_job(&db, &storage(), "emp", &gone.id).await.unwrap();
        assert!(matches!(
            get_job(&db, &gone.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(get_job(&db, &keep.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_removes_stored_resumes() {
        let db = seeded().await;
        db.insert_user(&user("ada", "ada@example.com", UserRole::JobSeeker))
            .await
            .unwrap();
        let storage = storage();
        let doomed = create_job(&db, "emp", form(), date(2026, 10, 16))
            .await
            .unwrap();
        let kept = create_job(&db, "emp", form(), date(2026, 10, 16))
            .await
            .unwrap();
        db.insert_application(&application("a1", &doomed.id, "ada"))
            .await
            .unwrap();
        db.insert_application(&application("a2", &kept.id, "ada"))
            .await
            .unwrap();
        storage.save_resume("a1", "cv.pdf", b"%PDF-1.7").await.unwrap();
        storage.save_resume("a2", "cv.pdf", b"%PDF-1.7").await.unwrap();

        delete_job(&db, &storage, "emp", &doomed.id).await.unwrap();

        assert!(db.fetch_application("a1").await.unwrap().is_none());
        assert!(matches!(
            storage.read_resume("a1", "cv.pdf").await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(
            storage.read_resume("a2", "cv.pdf").await.unwrap(),
            b"%PDF-1.7"
        );
        storage.delete_application("a2").await.unwrap();
    }
}
