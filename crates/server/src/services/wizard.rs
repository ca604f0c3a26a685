//! Three-step job application form.
//!
//! `Personal -> Professional -> FinalDetails -> submitted`. Moving forward
//! validates the fields of the current step; moving back never validates.
//! Submission re-checks every step so a form cannot skip ahead.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    db::models::WorkType,
    error::{AppError, FieldErrors},
};

/// Resumes must be strictly smaller than this many bytes.
pub const MAX_RESUME_BYTES: u64 = 5_000_000;

pub const ACCEPTED_RESUME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    Personal,
    Professional,
    FinalDetails,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [
        WizardStep::Personal,
        WizardStep::Professional,
        WizardStep::FinalDetails,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            WizardStep::Personal => 0,
            WizardStep::Professional => 1,
            WizardStep::FinalDetails => 2,
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Checks the fields that belong to this step and reports every failing
    /// one.
    pub fn validate(self, form: &ApplicationForm) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut check = |ok: bool, field: &'static str, message: &'static str| {
            if !ok {
                errors.entry(field).or_insert(message);
            }
        };

        match self {
            WizardStep::Personal => {
                check(
                    min_chars(&form.first_name, 2),
                    "firstName",
                    "First name must be at least 2 characters",
                );
                check(
                    min_chars(&form.last_name, 2),
                    "lastName",
                    "Last name must be at least 2 characters",
                );
                check(
                    is_valid_email(&form.email),
                    "email",
                    "Please enter a valid email address",
                );
                check(
                    min_chars(&form.phone, 10),
                    "phone",
                    "Phone number must be at least 10 digits",
                );
            }
            WizardStep::Professional => {
                check(
                    min_chars(&form.current_role, 2),
                    "currentRole",
                    "Current role is required",
                );
                check(
                    min_chars(&form.experience, 1),
                    "experience",
                    "Please select your experience level",
                );
                // separators alone leave nothing to store
                check(
                    min_chars(&form.skills, 3) && !split_skills(&form.skills).is_empty(),
                    "skills",
                    "Please list your key skills",
                );
            }
            WizardStep::FinalDetails => {
                check(
                    min_chars(&form.notice_period, 1),
                    "noticePeriod",
                    "Please select your notice period",
                );
                check(
                    min_chars(&form.expected_salary, 1),
                    "expectedSalary",
                    "Expected salary is required",
                );
                match &form.resume {
                    None => check(false, "resumeFile", "Resume is required"),
                    Some(resume) => {
                        check(
                            resume.size < MAX_RESUME_BYTES,
                            "resumeFile",
                            "Max file size is 5MB",
                        );
                        check(
                            ACCEPTED_RESUME_TYPES.contains(&resume.content_type.as_str()),
                            "resumeFile",
                            "Only .pdf, .doc and .docx files are accepted",
                        );
                    }
                }
                check(
                    WorkType::from_form_value(&form.work_type).is_some(),
                    "workType",
                    "Please select a work type",
                );
                check(
                    form.terms_accepted,
                    "termsAccepted",
                    "You must accept the terms and conditions",
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("email pattern compiles")
    })
}

pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && email_pattern().is_match(value)
}

/// Metadata of the uploaded resume. The bytes travel separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInfo {
    pub file_name: String,
    pub size: u64,
    pub content_type: String,
}

/// Raw form values, exactly as typed or selected by the applicant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub current_role: String,
    pub experience: String,
    pub skills: String,
    pub cover_letter: Option<String>,
    pub notice_period: String,
    pub expected_salary: String,
    pub resume: Option<ResumeInfo>,
    pub work_type: String,
    pub terms_accepted: bool,
}

/// A form that passed every step, with typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedApplication {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub current_role: String,
    pub experience: String,
    pub skills: Vec<String>,
    pub cover_letter: Option<String>,
    pub notice_period: String,
    pub expected_salary: String,
    pub resume: ResumeInfo,
    pub work_type: WorkType,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("The application can only be submitted from the final step")]
    NotOnFinalStep(WizardStep),
    #[error("Step {} has invalid fields", .step.index())]
    Invalid {
        step: WizardStep,
        errors: FieldErrors,
    },
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Invalid { errors, .. } => AppError::InvalidFields(errors),
            other => AppError::Validation(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApplicationWizard {
    step: WizardStep,
    form: ApplicationForm,
}

impl ApplicationWizard {
    pub fn new(form: ApplicationForm) -> Self {
        Self::resume(WizardStep::Personal, form)
    }

    /// Picks the wizard up at `step`, as the browser reports it.
    pub fn resume(step: WizardStep, form: ApplicationForm) -> Self {
        Self { step, form }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Advances one step when the current step is valid. On the final step
    /// this only validates; use [`submit`](Self::submit) to finish.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.step
            .validate(&self.form)
            .map_err(|errors| WizardError::Invalid {
                step: self.step,
                errors,
            })?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    pub fn submit(self) -> Result<ValidatedApplication, WizardError> {
        if self.step != WizardStep::FinalDetails {
            return Err(WizardError::NotOnFinalStep(self.step));
        }
        for step in WizardStep::ALL {
            step.validate(&self.form)
                .map_err(|errors| WizardError::Invalid { step, errors })?;
        }

        let form = self.form;
        // Both unwrapped values were checked by the FinalDetails step
        let (Some(resume), Some(work_type)) =
            (form.resume, WorkType::from_form_value(&form.work_type))
        else {
            return Err(WizardError::NotOnFinalStep(WizardStep::FinalDetails));
        };

        Ok(ValidatedApplication {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone: form.phone,
            current_role: form.current_role,
            experience: form.experience,
            skills: split_skills(&form.skills),
            cover_letter: form.cover_letter.filter(|c| !c.trim().is_empty()),
            notice_period: form.notice_period,
            expected_salary: form.expected_salary,
            resume,
            work_type,
        })
    }

    /// Walks a complete form through every step, as the applicant would.
    pub fn complete(form: ApplicationForm) -> Result<ValidatedApplication, WizardError> {
        let mut wizard = Self::new(form);
        while wizard.step != WizardStep::FinalDetails {
            wizard.next()?;
        }
        wizard.submit()
    }
}

/// Skills are typed as a comma separated list.
pub fn split_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ApplicationForm {
        ApplicationForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "5551234567".to_string(),
            current_role: "Engineer".to_string(),
            experience: "5-10".to_string(),
            skills: "Rust, SQL, TypeScript".to_string(),
            cover_letter: None,
            notice_period: "2 weeks".to_string(),
            expected_salary: "$120,000".to_string(),
            resume: Some(ResumeInfo {
                file_name: "resume.pdf".to_string(),
                size: 120_000,
                content_type: "application/pdf".to_string(),
            }),
            work_type: "remote".to_string(),
            terms_accepted: true,
        }
    }

    fn failing_field(step: WizardStep, form: &ApplicationForm) -> Vec<&'static str> {
        match step.validate(form) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.keys().copied().collect(),
        }
    }

    #[test]
    fn valid_form_passes_every_step() {
        let form = valid_form();
        for step in WizardStep::ALL {
            assert_eq!(step.validate(&form), Ok(()), "{step:?}");
        }
    }

    fn break_field(form: &mut ApplicationForm, field: &str) {
        match field {
            "firstName" => form.first_name = "A".to_string(),
            "lastName" => form.last_name = "L".to_string(),
            "email" => form.email = "ada@".to_string(),
            "phone" => form.phone = "555123456".to_string(),
            "currentRole" => form.current_role = "E".to_string(),
            "experience" => form.experience.clear(),
            "skills" => form.skills = "Go".to_string(),
            "noticePeriod" => form.notice_period.clear(),
            "expectedSalary" => form.expected_salary.clear(),
            "resumeFile" => form.resume = None,
            "workType" => form.work_type = "office".to_string(),
            "termsAccepted" => form.terms_accepted = false,
            other => panic!("no breaker for {other}"),
        }
    }

    #[test]
    fn each_single_violation_fails_its_step() {
        let cases = [
            (WizardStep::Personal, "firstName"),
            (WizardStep::Personal, "lastName"),
            (WizardStep::Personal, "email"),
            (WizardStep::Personal, "phone"),
            (WizardStep::Professional, "currentRole"),
            (WizardStep::Professional, "experience"),
            (WizardStep::Professional, "skills"),
            (WizardStep::FinalDetails, "noticePeriod"),
            (WizardStep::FinalDetails, "expectedSalary"),
            (WizardStep::FinalDetails, "resumeFile"),
            (WizardStep::FinalDetails, "workType"),
            (WizardStep::FinalDetails, "termsAccepted"),
        ];

        for (step, field) in cases {
            let mut form = valid_form();
            break_field(&mut form, field);
            assert_eq!(failing_field(step, &form), vec![field], "{field}");
            for other in WizardStep::ALL.into_iter().filter(|s| *s != step) {
                assert_eq!(other.validate(&form), Ok(()), "{field} leaked into {other:?}");
            }
        }
    }

    #[test]
    fn resume_size_must_be_below_five_megabytes() {
        let mut form = valid_form();
        if let Some(resume) = form.resume.as_mut() {
            resume.size = MAX_RESUME_BYTES - 1;
        }
        assert_eq!(WizardStep::FinalDetails.validate(&form), Ok(()));

        if let Some(resume) = form.resume.as_mut() {
            resume.size = MAX_RESUME_BYTES;
        }
        let errors = WizardStep::FinalDetails.validate(&form).unwrap_err();
        assert_eq!(errors.get("resumeFile"), Some(&"Max file size is 5MB"));
    }

    #[test]
    fn resume_must_be_pdf_or_word() {
        let mut form = valid_form();
        for accepted in ACCEPTED_RESUME_TYPES {
            if let Some(resume) = form.resume.as_mut() {
                resume.content_type = accepted.to_string();
            }
            assert_eq!(WizardStep::FinalDetails.validate(&form), Ok(()), "{accepted}");
        }

        if let Some(resume) = form.resume.as_mut() {
            resume.content_type = "image/png".to_string();
        }
        assert_eq!(
            failing_field(WizardStep::FinalDetails, &form),
            vec!["resumeFile"]
        );
    }

    #[test]
    fn work_type_accepts_the_three_options() {
        let mut form = valid_form();
        for work_type in ["onsite", "remote", "hybrid"] {
            form.work_type = work_type.to_string();
            assert_eq!(WizardStep::FinalDetails.validate(&form), Ok(()));
        }
    }

    #[test]
    fn email_syntax() {
        for good in ["a@b.co", "first.last+tag@mail.example.org", "o'neil@example.ie"] {
            assert!(is_valid_email(good), "{good}");
        }
        for bad in ["", "plain", "@example.com", "a@b", "a..b@example.com", ".a@example.com", "a b@example.com", "a@example.c"] {
            assert!(!is_valid_email(bad), "{bad}");
        }
    }

    #[test]
    fn next_stays_put_on_invalid_step_and_reports_all_fields() {
        let mut form = valid_form();
        form.first_name.clear();
        form.phone.clear();
        let mut wizard = ApplicationWizard::new(form);

        match wizard.next() {
            Err(WizardError::Invalid { step, errors }) => {
                assert_eq!(step, WizardStep::Personal);
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected invalid step, got {other:?}"),
        }
        assert_eq!(wizard.step(), WizardStep::Personal);

        let mut wizard = ApplicationWizard::resume(wizard.step(), valid_form());
        assert_eq!(wizard.next().unwrap(), WizardStep::Professional);
    }

    #[test]
    fn back_never_validates() {
        let mut wizard = ApplicationWizard::new(valid_form());
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.step(), WizardStep::FinalDetails);

        let mut wizard = ApplicationWizard::resume(wizard.step(), ApplicationForm::default());
        assert_eq!(wizard.back(), WizardStep::Professional);
        assert_eq!(wizard.back(), WizardStep::Personal);
        assert_eq!(wizard.back(), WizardStep::Personal);
    }

    #[test]
    fn skills_need_at_least_one_entry() {
        for blank in [",,,", " , , "] {
            let mut form = valid_form();
            form.skills = blank.to_string();
            let errors = WizardStep::Professional.validate(&form).unwrap_err();
            assert_eq!(errors.get("skills"), Some(&"Please list your key skills"));
        }

        let mut form = valid_form();
        form.skills = "Go,".to_string();
        assert!(WizardStep::Professional.validate(&form).is_ok());
    }

    #[test]
    fn submit_requires_the_final_step() {
        let wizard = ApplicationWizard::new(valid_form());
        assert!(matches!(
            wizard.submit(),
            Err(WizardError::NotOnFinalStep(WizardStep::Personal))
        ));
    }

    #[test]
    fn submit_rechecks_earlier_steps() {
        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        let wizard = ApplicationWizard::resume(WizardStep::FinalDetails, form);

        match wizard.submit() {
            Err(WizardError::Invalid { step, errors }) => {
                assert_eq!(step, WizardStep::Personal);
                assert!(errors.contains_key("email"));
            }
            other => panic!("expected invalid personal step, got {other:?}"),
        }
    }

    #[test]
    fn complete_produces_typed_application() {
        let validated = ApplicationWizard::complete(valid_form()).unwrap();
        assert_eq!(validated.work_type, WorkType::Remote);
        assert_eq!(
            validated.skills,
            vec!["Rust".to_string(), "SQL".to_string(), "TypeScript".to_string()]
        );
        assert_eq!(validated.resume.file_name, "resume.pdf");
        assert_eq!(validated.cover_letter, None);
    }
}
