use axum::async_trait;
use sqlx::{query::Query, sqlite::SqliteArguments, Sqlite};

use super::{
    models::{ApplicationStatus, JobApplication, Profile},
    profiles,
    repository::{ApplicationRepository, RepoResult, RepositoryError},
    Database,
};

const ALREADY_APPLIED: &str = "You have already applied for this job";

fn insert_query(application: &JobApplication) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    sqlx::query(
        r#"
        INSERT INTO job_applications (
            id, job_id, applicant_id, applied_date, status, status_update_date, notes,
            match_score, interview_date, resume_url, resume_file_name, resume_content_type,
            cover_letter, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&application.id)
    .bind(&application.job_id)
    .bind(&application.applicant_id)
    .bind(application.applied_date)
    .bind(application.status)
    .bind(application.status_update_date)
    .bind(&application.notes)
    .bind(application.match_score)
    .bind(&application.interview_date)
    .bind(&application.resume_url)
    .bind(&application.resume_file_name)
    .bind(&application.resume_content_type)
    .bind(&application.cover_letter)
    .bind(application.created_at)
    .bind(application.updated_at)
}

#[async_trait]
impl ApplicationRepository for Database {
    async fn insert_application(&self, application: &JobApplication) -> RepoResult<()> {
        insert_query(application)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::on_unique(e, ALREADY_APPLIED))?;
        Ok(())
    }

    async fn record_application(
        &self,
        application: &JobApplication,
        profile: &Profile,
    ) -> RepoResult<Profile> {
        let mut tx = self.pool.begin().await?;

        insert_query(application)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::on_unique(e, ALREADY_APPLIED))?;
        let stored = profiles::upsert_query(profile).fetch_one(&mut *tx).await?;

        tx.commit().await?;
        Ok(stored)
    }

    async fn fetch_application(&self, id: &str) -> RepoResult<Option<JobApplication>> {
        let application =
            sqlx::query_as::<_, JobApplication>("SELECT * FROM job_applications WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(application)
    }

    async fn update_application(&self, application: &JobApplication) -> RepoResult<bool> {
        // Only the fields an employer can change after submission
        let result = sqlx::query(
            r#"
            UPDATE job_applications SET
                status = ?, status_update_date = ?, notes = ?, match_score = ?,
                interview_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(application.status)
        .bind(application.status_update_date)
        .bind(&application.notes)
        .bind(application.match_score)
        .bind(&application.interview_date)
        .bind(application.updated_at)
        .bind(&application.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_application(
        &self,
        job_id: &str,
        applicant_id: &str,
    ) -> RepoResult<Option<JobApplication>> {
        let application = sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications WHERE job_id = ? AND applicant_id = ? LIMIT 1",
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    async fn list_for_job(&self, job_id: &str) -> RepoResult<Vec<JobApplication>> {
        let applications = sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications WHERE job_id = ? ORDER BY applied_date DESC, created_at DESC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn list_for_applicant(&self, applicant_id: &str) -> RepoResult<Vec<JobApplication>> {
        let applications = sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications WHERE applicant_id = ? ORDER BY applied_date DESC, created_at DESC",
        )
        .bind(applicant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn count_by_status(&self, job_id: &str) -> RepoResult<Vec<(ApplicationStatus, i64)>> {
        let counts = sqlx::query_as::<_, (ApplicationStatus, i64)>(
            "SELECT status, COUNT(*) FROM job_applications WHERE job_id = ? GROUP BY status",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }
}
