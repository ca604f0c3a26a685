//! Application status workflow.
//!
//! Employers pick any status from the review dropdown at any time, so
//! transitions are not guarded: every source status may move to every target
//! status, including itself.

use chrono::{NaiveDate, Utc};

use crate::db::models::{ApplicationStatus, JobApplication};

/// Moves `application` to `status` and stamps the change with `today`.
pub fn set_status(application: &mut JobApplication, status: ApplicationStatus, today: NaiveDate) {
    if application.status != status {
        tracing::debug!(
            application_id = %application.id,
            from = application.status.label(),
            to = status.label(),
            "application status changed"
        );
        if status.is_terminal() {
            tracing::info!(
                application_id = %application.id,
                job_id = %application.job_id,
                decision = status.label(),
                "application decided"
            );
        }
    }
    application.status = status;
    application.status_update_date = Some(today);
    application.updated_at = Utc::now();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{application, date};

    #[test]
    fn any_status_reaches_any_status() {
        let today = date(2026, 10, 16);
        for from in ApplicationStatus::ALL {
            for to in ApplicationStatus::ALL {
                let mut app = application("a1", "j1", "ada");
                app.status = from;
                set_status(&mut app, to, today);
                assert_eq!(app.status, to, "{from:?} -> {to:?}");
                assert_eq!(app.status_update_date, Some(today));
            }
        }
    }

    #[test]
    fn reapplying_the_same_status_still_stamps_the_date() {
        let mut app = application("a1", "j1", "ada");
        app.status_update_date = Some(date(2026, 1, 1));
        set_status(&mut app, ApplicationStatus::Pending, date(2026, 10, 16));
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.status_update_date, Some(date(2026, 10, 16)));
    }

    #[test]
    fn terminal_statuses_do_not_block_changes() {
        assert!(ApplicationStatus::Accepted.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
        assert!(!ApplicationStatus::Reviewing.is_terminal());

        let mut app = application("a1", "j1", "ada");
        app.status = ApplicationStatus::Rejected;
        set_status(&mut app, ApplicationStatus::Reviewing, date(2026, 10, 16));
        assert_eq!(app.status, ApplicationStatus::Reviewing);
    }
}
