use axum::async_trait;

use super::{
    models::User,
    repository::{RepoResult, RepositoryError, UserRepository},
    Database,
};

#[async_trait]
impl UserRepository for Database {
    async fn insert_user(&self, user: &User) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, full_name, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::on_unique(e, "Email already registered"))?;

        Ok(())
    }

    async fn find_user(&self, id: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{fixtures::user, models::UserRole};

    #[tokio::test]
    async fn email_is_unique() {
        let db = Database::in_memory().await;
        db.insert_user(&user("u1", "a@example.com", UserRole::Employer))
            .await
            .unwrap();

        let err = db
            .insert_user(&user("u2", "a@example.com", UserRole::JobSeeker))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let found = db.find_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, "u1");
        assert_eq!(found.role, UserRole::Employer);
    }
}
