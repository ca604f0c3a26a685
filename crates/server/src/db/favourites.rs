use axum::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{
    models::Job,
    repository::{FavouriteRepository, RepoResult, RepositoryError},
    Database,
};

#[async_trait]
impl FavouriteRepository for Database {
    async fn insert_favourite(&self, user_id: &str, job_id: &str) -> RepoResult<()> {
        sqlx::query("INSERT INTO favourites (id, user_id, job_id, saved_at) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(user_id)
            .bind(job_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::on_unique(e, "Job already saved"))?;
        Ok(())
    }

    async fn delete_favourite(&self, user_id: &str, job_id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM favourites WHERE user_id = ? AND job_id = ?")
            .bind(user_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_favourite(&self, user_id: &str, job_id: &str) -> RepoResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM favourites WHERE user_id = ? AND job_id = ?",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn favourite_jobs(&self, user_id: &str) -> RepoResult<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT j.*
            FROM favourites f
            JOIN jobs j ON f.job_id = j.id
            WHERE f.user_id = ?
            ORDER BY f.saved_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }
}
