use serde_json::json;

use crate::{
    applications::{dto::ApplicationForm, repo_types::ApplicationFields},
    forms::{optional, push_error, FieldErrors},
    pipeline::ApplicationStatus,
    templates::{Templates, APPLICATION_MODAL},
};

pub const TEXT_MAX_LEN: usize = 255;
pub const URL_MAX_LEN: usize = 500;
pub const SALARY_MAX_LEN: usize = 100;

fn required(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    label: &str,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        push_error(errors, field, format!("{label} is required."));
    } else if value.chars().count() > TEXT_MAX_LEN {
        push_error(
            errors,
            field,
            format!("{label} cannot be longer than {TEXT_MAX_LEN} characters."),
        );
    }
    value.to_string()
}

fn is_web_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

pub(crate) fn validate_application_form(
    form: &ApplicationForm,
) -> Result<ApplicationFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let company = required(&mut errors, "company", &form.company, "Company name");
    let job_title = required(&mut errors, "job_title", &form.job_title, "Job title");
    let location = required(&mut errors, "location", &form.location, "Location");

    let url = optional(&form.url);
    if let Some(raw) = &url {
        if raw.chars().count() > URL_MAX_LEN {
            push_error(
                &mut errors,
                "url",
                format!("URL cannot be longer than {URL_MAX_LEN} characters."),
            );
        } else if !is_web_url(raw) {
            push_error(&mut errors, "url", "Please enter a valid URL.");
        }
    }

    let salary = optional(&form.salary);
    if salary.as_ref().is_some_and(|s| s.chars().count() > SALARY_MAX_LEN) {
        push_error(
            &mut errors,
            "salary",
            format!("Salary cannot be longer than {SALARY_MAX_LEN} characters."),
        );
    }

    let status = match form.status.trim() {
        "" => ApplicationStatus::Wishlist,
        raw => raw.parse().unwrap_or_else(|_| {
            push_error(&mut errors, "status", "The selected choice is invalid.");
            ApplicationStatus::Wishlist
        }),
    };

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ApplicationFields {
        company,
        job_title,
        location,
        url,
        salary,
        description: form.description.trim().to_string(),
        status,
    })
}

pub(crate) struct ApplicationModal<'a> {
    pub title: &'a str,
    pub action: String,
    pub submit_label: &'a str,
    pub board_name: Option<&'a str>,
    pub delete_action: Option<String>,
}

pub(crate) fn render_application_modal(
    templates: &Templates,
    modal: ApplicationModal<'_>,
    form: &ApplicationForm,
    errors: &FieldErrors,
) -> Result<String, minijinja::Error> {
    let statuses: Vec<_> = ApplicationStatus::ALL
        .into_iter()
        .map(|s| json!({ "value": s.as_str(), "label": s.label() }))
        .collect();

    let mut form = form.clone();
    if form.status.trim().is_empty() {
        form.status = ApplicationStatus::default().as_str().to_string();
    }

    templates.render(
        APPLICATION_MODAL,
        &json!({
            "title": modal.title,
            "action": modal.action,
            "submit_label": modal.submit_label,
            "board_name": modal.board_name,
            "delete_action": modal.delete_action,
            "form": form,
            "errors": errors,
            "statuses": statuses,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid_form() -> ApplicationForm {
        ApplicationForm {
            company: "Google".into(),
            job_title: "Software Engineer".into(),
            location: "Mountain View".into(),
            ..ApplicationForm::default()
        }
    }

    #[test]
    fn blank_status_defaults_to_wishlist() {
        let fields = validate_application_form(&valid_form()).unwrap();
        assert_eq!(fields.status, ApplicationStatus::Wishlist);
        assert_eq!(fields.url, None);
        assert_eq!(fields.salary, None);
    }

    #[test]
    fn required_fields_are_reported_together() {
        let errors = validate_application_form(&ApplicationForm::default()).unwrap_err();
        assert_eq!(errors["company"], vec!["Company name is required.".to_string()]);
        assert_eq!(errors["job_title"], vec!["Job title is required.".to_string()]);
        assert_eq!(errors["location"], vec!["Location is required.".to_string()]);
        assert!(!errors.contains_key("status"));
    }

    #[rstest]
    #[case("https://careers.google.com/jobs/1", true)]
    #[case("http://example.com", true)]
    #[case("careers.google.com", false)]
    #[case("ftp://example.com/file", false)]
    #[case("javascript:alert(1)", false)]
    fn url_must_be_web_address(#[case] url: &str, #[case] ok: bool) {
        let form = ApplicationForm {
            url: url.into(),
            ..valid_form()
        };
        assert_eq!(validate_application_form(&form).is_ok(), ok);
    }

    #[test]
    fn unknown_status_is_a_field_error() {
        let form = ApplicationForm {
            status: "hired".into(),
            ..valid_form()
        };
        let errors = validate_application_form(&form).unwrap_err();
        assert_eq!(
            errors["status"],
            vec!["The selected choice is invalid.".to_string()]
        );
    }

    #[test]
    fn modal_keeps_submitted_values_and_selects_status() {
        let templates = Templates::new().unwrap();
        let form = ApplicationForm {
            company: String::new(),
            job_title: "Site Reliability Engineer".into(),
            status: "interview".into(),
            ..ApplicationForm::default()
        };
        let errors = validate_application_form(&form).unwrap_err();

        let html = render_application_modal(
            &templates,
            ApplicationModal {
                title: "Edit Application",
                action: "/update".into(),
                submit_label: "Save Changes",
                board_name: None,
                delete_action: None,
            },
            &form,
            &errors,
        )
        .unwrap();

        assert!(html.contains("Company name is required."));
        assert!(html.contains("value=\"Site Reliability Engineer\""));
        assert!(html.contains("value=\"interview\" selected"));
        assert!(!html.contains("none"));
    }
}
