use axum::async_trait;
use sqlx::{query::QueryAs, sqlite::SqliteArguments, Sqlite};

use super::{
    models::Profile,
    repository::{ProfileRepository, RepoResult},
    Database,
};

#[async_trait]
impl ProfileRepository for Database {
    async fn profile_for_user(&self, user_id: &str) -> RepoResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn upsert_profile(&self, profile: &Profile) -> RepoResult<Profile> {
        let stored = upsert_query(profile).fetch_one(&self.pool).await?;
        Ok(stored)
    }
}

/// Inserts or replaces the profile keyed by `user_id`, returning the stored row.
pub(super) fn upsert_query(profile: &Profile) -> QueryAs<'_, Sqlite, Profile, SqliteArguments<'_>> {
    sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (
            id, user_id, first_name, last_name, phone, current_role, experience, skills,
            notice_period, expected_salary, resume_url, resume_file_name, cover_letter_url,
            preferred_work_type, willing_to_relocate, about, profile_picture, location,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (user_id) DO UPDATE SET
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            phone = excluded.phone,
            current_role = excluded.current_role,
            experience = excluded.experience,
            skills = excluded.skills,
            notice_period = excluded.notice_period,
            expected_salary = excluded.expected_salary,
            resume_url = excluded.resume_url,
            resume_file_name = excluded.resume_file_name,
            cover_letter_url = excluded.cover_letter_url,
            preferred_work_type = excluded.preferred_work_type,
            willing_to_relocate = excluded.willing_to_relocate,
            about = excluded.about,
            profile_picture = excluded.profile_picture,
            location = excluded.location,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(&profile.id)
    .bind(&profile.user_id)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.phone)
    .bind(&profile.current_role)
    .bind(&profile.experience)
    .bind(&profile.skills)
    .bind(&profile.notice_period)
    .bind(&profile.expected_salary)
    .bind(&profile.resume_url)
    .bind(&profile.resume_file_name)
    .bind(&profile.cover_letter_url)
    .bind(profile.preferred_work_type)
    .bind(profile.willing_to_relocate)
    .bind(&profile.about)
    .bind(&profile.profile_picture)
    .bind(&profile.location)
    .bind(profile.created_at)
    .bind(profile.updated_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        fixtures::{profile, user},
        models::{UserRole, WorkType},
        repository::UserRepository,
    };

    #[tokio::test]
    async fn second_upsert_updates_the_same_row() {
        let db = Database::in_memory().await;
        db.insert_user(&user("ada", "ada@example.com", UserRole::JobSeeker))
            .await
            .unwrap();

        let first = db.upsert_profile(&profile("p1", "ada")).await.unwrap();
        assert_eq!(first.id, "p1");
        assert_eq!(first.skills.0, vec!["Rust".to_string(), "SQL".to_string()]);

        let mut changed = profile("p2", "ada");
        changed.phone = Some("5550000000".to_string());
        changed.preferred_work_type = Some(WorkType::Remote);
        let second = db.upsert_profile(&changed).await.unwrap();

        assert_eq!(second.id, "p1");
        assert_eq!(second.phone.as_deref(), Some("5550000000"));
        assert_eq!(second.preferred_work_type, Some(WorkType::Remote));

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
