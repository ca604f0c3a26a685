//! Storage traits used by the services. [`Database`](super::Database)
//! implements all of them on top of SQLite.

use axum::async_trait;

use super::models::{ApplicationStatus, Job, JobApplication, JobStatus, Profile, User};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Conflict(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Unique-index violations become `Conflict(message)`.
    pub(crate) fn on_unique(err: sqlx::Error, message: &'static str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Conflict(message),
            _ => Self::Database(err),
        }
    }
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Optional filters for job listings. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub employer_id: Option<String>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: &User) -> RepoResult<()>;
    async fn find_user(&self, id: &str) -> RepoResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert_job(&self, job: &Job) -> RepoResult<()>;
    async fn fetch_job(&self, id: &str) -> RepoResult<Option<Job>>;
    /// Returns false when no row has the job's id.
    async fn update_job(&self, job: &Job) -> RepoResult<bool>;
    /// Returns false when no row has this id.
    async fn delete_job(&self, id: &str) -> RepoResult<bool>;
    async fn list_jobs(&self, filter: &JobFilter) -> RepoResult<Vec<Job>>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Fails with `Conflict` when the applicant already applied for the job.
    async fn insert_application(&self, application: &JobApplication) -> RepoResult<()>;
    /// Inserts the application and upserts the applicant's profile
    /// atomically. Neither is written when the insert fails.
    async fn record_application(
        &self,
        application: &JobApplication,
        profile: &Profile,
    ) -> RepoResult<Profile>;
    async fn fetch_application(&self, id: &str) -> RepoResult<Option<JobApplication>>;
    async fn update_application(&self, application: &JobApplication) -> RepoResult<bool>;
    async fn find_application(
        &self,
        job_id: &str,
        applicant_id: &str,
    ) -> RepoResult<Option<JobApplication>>;
    async fn list_for_job(&self, job_id: &str) -> RepoResult<Vec<JobApplication>>;
    async fn list_for_applicant(&self, applicant_id: &str) -> RepoResult<Vec<JobApplication>>;
    async fn count_by_status(&self, job_id: &str) -> RepoResult<Vec<(ApplicationStatus, i64)>>;
}

#[async_trait]
pub trait FavouriteRepository: Send + Sync {
    /// Fails with `Conflict` when the user already saved the job.
    async fn insert_favourite(&self, user_id: &str, job_id: &str) -> RepoResult<()>;
    async fn delete_favourite(&self, user_id: &str, job_id: &str) -> RepoResult<bool>;
    async fn is_favourite(&self, user_id: &str, job_id: &str) -> RepoResult<bool>;
    async fn favourite_jobs(&self, user_id: &str) -> RepoResult<Vec<Job>>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn profile_for_user(&self, user_id: &str) -> RepoResult<Option<Profile>>;
    /// Inserts or replaces the profile keyed by `user_id` and returns the
    /// stored row. The id and `created_at` of an existing row are kept.
    async fn upsert_profile(&self, profile: &Profile) -> RepoResult<Profile>;
}

/// Everything the services need from storage.
pub trait Store:
    UserRepository + JobRepository + ApplicationRepository + FavouriteRepository + ProfileRepository
{
}

impl<T: ?Sized> Store for T where
    T: UserRepository
        + JobRepository
        + ApplicationRepository
        + FavouriteRepository
        + ProfileRepository
{
}
