use bytes::Bytes;

use crate::errors::AppError;

/// An uploaded résumé as received from the client.
#[derive(Debug, Clone, Default)]
pub struct CvUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Raw create-request input. Every part is optional until validated.
#[derive(Debug, Clone, Default)]
pub struct CandidateForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cv: Option<CvUpload>,
}

/// A create request that passed validation. Text fields are kept as submitted.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cv: CvUpload,
}

/// Checks that `name`, `email`, `phone` and a non-empty `cv` file are all present.
/// Every problem is reported in a single `Validation` error.
pub fn validate_new_candidate(form: CandidateForm) -> Result<NewCandidate, AppError> {
    let mut problems = Vec::new();

    let name = required_text(form.name, "name", &mut problems);
    let phone = required_text(form.phone, "phone", &mut problems);
    let email = required_text(form.email, "email", &mut problems);
    if let Some(email) = &email {
        if !is_plausible_email(email) {
            problems.push(format!("email '{email}' is not a valid address"));
        }
    }

    let cv = form.cv.filter(|cv| !cv.data.is_empty());
    if cv.is_none() {
        problems.push("cv file is required".to_string());
    }

    match (name, email, phone, cv) {
        (Some(name), Some(email), Some(phone), Some(cv)) if problems.is_empty() => {
            Ok(NewCandidate {
                name,
                email,
                phone,
                cv,
            })
        }
        _ => Err(AppError::Validation(problems.join("; "))),
    }
}

fn required_text(value: Option<String>, field: &str, problems: &mut Vec<String>) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            problems.push(format!("{field} is required"));
            None
        }
    }
}

/// Loose syntactic check: one `@`, a non-empty local part, a dotted domain.
pub fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
