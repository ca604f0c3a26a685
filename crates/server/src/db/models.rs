use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum UserRole {
    JobSeeker,
    Employer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum JobStatus {
    Active,
    Closed,
    Draft,
}

/// Review state of a [`JobApplication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum ApplicationStatus {
    Pending,
    Reviewing,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    #[cfg(test)]
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewing,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    /// Accepted and rejected applications get no further action in the review
    /// screen. Nothing stops a later status change.
    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Reviewing => "Reviewing",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum WorkType {
    #[serde(alias = "onsite")]
    Onsite,
    #[serde(alias = "remote")]
    Remote,
    #[serde(alias = "hybrid")]
    Hybrid,
}

impl WorkType {
    /// Parses the lowercase values posted by the application form.
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value.trim() {
            "onsite" | "Onsite" => Some(WorkType::Onsite),
            "remote" | "Remote" => Some(WorkType::Remote),
            "hybrid" | "Hybrid" => Some(WorkType::Hybrid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub logo: Option<String>,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary: String,
    pub experience: String,
    pub posted: NaiveDate,
    pub status: JobStatus,
    pub description: String,
    pub responsibilities: String,
    pub requirements: String,
    pub benefits: String,
    pub company_description: String,
    pub employer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: String,
    pub job_id: String,
    pub applicant_id: String,
    pub applied_date: NaiveDate,
    pub status: ApplicationStatus,
    pub status_update_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub match_score: Option<i32>,
    pub interview_date: Option<String>,
    pub resume_url: Option<String>,
    pub resume_file_name: Option<String>,
    #[serde(skip_serializing)]
    pub resume_content_type: Option<String>,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub current_role: Option<String>,
    pub experience: Option<String>,
    pub skills: Json<Vec<String>>,
    pub notice_period: Option<String>,
    pub expected_salary: Option<String>,
    pub resume_url: Option<String>,
    pub resume_file_name: Option<String>,
    pub cover_letter_url: Option<String>,
    pub preferred_work_type: Option<WorkType>,
    pub willing_to_relocate: bool,
    pub about: Option<String>,
    pub profile_picture: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
