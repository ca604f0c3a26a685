//! Row builders shared by the database and service tests.

use chrono::{NaiveDate, Utc};
use sqlx::types::Json;

use super::models::{
    ApplicationStatus, Job, JobApplication, JobStatus, Profile, User, UserRole,
};

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(crate) fn user(id: &str, email: &str, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        full_name: "Test User".to_string(),
        role,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn job(id: &str, employer_id: &str) -> Job {
    let now = Utc::now();
    Job {
        id: id.to_string(),
        title: "Frontend Developer".to_string(),
        company: "Acme Inc.".to_string(),
        logo: None,
        location: "New York, NY".to_string(),
        job_type: "Full-time".to_string(),
        salary: "$90,000–$120,000".to_string(),
        experience: "Mid-level".to_string(),
        posted: date(2026, 10, 1),
        status: JobStatus::Active,
        description: "Build and ship the web client.".to_string(),
        responsibilities: "Own UI features end to end.".to_string(),
        requirements: "3+ years with TypeScript.".to_string(),
        benefits: "Health, dental, remote Fridays.".to_string(),
        company_description: "Acme makes everything.".to_string(),
        employer_id: employer_id.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn application(id: &str, job_id: &str, applicant_id: &str) -> JobApplication {
    let now = Utc::now();
    JobApplication {
        id: id.to_string(),
        job_id: job_id.to_string(),
        applicant_id: applicant_id.to_string(),
        applied_date: date(2026, 10, 2),
        status: ApplicationStatus::Pending,
        status_update_date: None,
        notes: None,
        match_score: None,
        interview_date: None,
        resume_url: None,
        resume_file_name: None,
        resume_content_type: None,
        cover_letter: None,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn profile(id: &str, user_id: &str) -> Profile {
    let now = Utc::now();
    Profile {
        id: id.to_string(),
        user_id: user_id.to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        phone: Some("5551234567".to_string()),
        current_role: Some("Engineer".to_string()),
        experience: Some("5-10".to_string()),
        skills: Json(vec!["Rust".to_string(), "SQL".to_string()]),
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
    }
}
