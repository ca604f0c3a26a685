use axum::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use super::{
    models::Job,
    repository::{JobFilter, JobRepository, RepoResult},
    Database,
};

/// `LIKE` pattern matching `needle` literally anywhere in the column.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl JobRepository for Database {
    async fn insert_job(&self, job: &Job) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, title, company, logo, location, job_type, salary, experience, posted, status,
                description, responsibilities, requirements, benefits, company_description,
                employer_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.logo)
        .bind(&job.location)
        .bind(&job.job_type)
        .bind(&job.salary)
        .bind(&job.experience)
        .bind(job.posted)
        .bind(job.status)
        .bind(&job.description)
        .bind(&job.responsibilities)
        .bind(&job.requirements)
        .bind(&job.benefits)
        .bind(&job.company_description)
        .bind(&job.employer_id)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_job(&self, id: &str) -> RepoResult<Option<Job>> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn update_job(&self, job: &Job) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE jobs SET
                title = ?, company = ?, logo = ?, location = ?, job_type = ?, salary = ?,
                experience = ?, posted = ?, status = ?, description = ?, responsibilities = ?,
                requirements = ?, benefits = ?, company_description = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.logo)
        .bind(&job.location)
        .bind(&job.job_type)
        .bind(&job.salary)
        .bind(&job.experience)
        .bind(job.posted)
        .bind(job.status)
        .bind(&job.description)
        .bind(&job.responsibilities)
        .bind(&job.requirements)
        .bind(&job.benefits)
        .bind(&job.company_description)
        .bind(job.updated_at)
        .bind(&job.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_job(&self, id: &str) -> RepoResult<bool> {
        // Applications and favourites go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_jobs(&self, filter: &JobFilter) -> RepoResult<Vec<Job>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM jobs WHERE 1 = 1");

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(employer_id) = &filter.employer_id {
            query.push(" AND employer_id = ").push_bind(employer_id.clone());
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(search);
            query
                .push(" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR company LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR description LIKE ")
                .push_bind(pattern)
                .push(r" ESCAPE '\')");
        }
        if let Some(location) = filter.location.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query
                .push(" AND location LIKE ")
                .push_bind(contains_pattern(location))
                .push(r" ESCAPE '\'");
        }
        if let Some(job_type) = filter.job_type.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(" AND job_type = ").push_bind(job_type.to_string());
        }

        query.push(" ORDER BY posted DESC, created_at DESC");

        let jobs = query.build_query_as::<Job>().fetch_all(&self.pool).await?;
        Ok(jobs)
    }
}
