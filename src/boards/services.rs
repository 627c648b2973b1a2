use serde_json::json;

use crate::{
    applications::repo_types::Application,
    boards::dto::BoardForm,
    forms::{optional, push_error, FieldErrors},
    kanban::protocol::{ApplicationCard, KanbanColumn},
    pipeline::ApplicationStatus,
    templates::{Templates, BOARD_MODAL},
};

pub const BOARD_NAME_MIN_LEN: usize = 2;
pub const BOARD_NAME_MAX_LEN: usize = 255;

#[derive(Debug, PartialEq, Eq)]
pub struct ValidBoard {
    pub name: String,
    pub description: Option<String>,
}

pub(crate) fn validate_board_form(form: &BoardForm) -> Result<ValidBoard, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = form.name.trim();
    let len = name.chars().count();

    if len == 0 {
        push_error(&mut errors, "name", "Board name is required.");
    } else if len < BOARD_NAME_MIN_LEN {
        push_error(
            &mut errors,
            "name",
            format!("Board name must be at least {BOARD_NAME_MIN_LEN} characters long."),
        );
    } else if len > BOARD_NAME_MAX_LEN {
        push_error(
            &mut errors,
            "name",
            format!("Board name cannot be longer than {BOARD_NAME_MAX_LEN} characters."),
        );
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ValidBoard {
        name: name.to_string(),
        description: optional(&form.description),
    })
}

/// Placement of the board modal: create when `delete_action` is `None`.
pub(crate) struct BoardModal<'a> {
    pub title: &'a str,
    pub action: String,
    pub submit_label: &'a str,
    pub delete_action: Option<String>,
}

pub(crate) fn render_board_modal(
    templates: &Templates,
    modal: BoardModal<'_>,
    form: &BoardForm,
    errors: &FieldErrors,
) -> Result<String, minijinja::Error> {
    templates.render(
        BOARD_MODAL,
        &json!({
            "title": modal.title,
            "action": modal.action,
            "submit_label": modal.submit_label,
            "delete_action": modal.delete_action,
            "form": form,
            "errors": errors,
        }),
    )
}

/// One column per status in board order. Input order is kept inside each
/// column, so callers pass applications newest first.
pub(crate) fn build_columns(applications: &[Application]) -> Vec<KanbanColumn> {
    ApplicationStatus::ALL
        .into_iter()
        .map(|status| KanbanColumn {
            status,
            label: status.label().to_string(),
            applications: applications
                .iter()
                .filter(|a| a.status == status)
                .map(ApplicationCard::from)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::repo_types::tests::fields;
    use rstest::rstest;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn form(name: &str, description: &str) -> BoardForm {
        BoardForm {
            name: name.into(),
            description: description.into(),
        }
    }

    #[rstest]
    #[case("", "Board name is required.")]
    #[case("   ", "Board name is required.")]
    #[case("X", "Board name must be at least 2 characters long.")]
    fn invalid_names(#[case] name: &str, #[case] message: &str) {
        let errors = validate_board_form(&form(name, "")).unwrap_err();
        assert_eq!(errors["name"], vec![message.to_string()]);
    }

    #[test]
    fn long_name_is_rejected() {
        let errors = validate_board_form(&form(&"a".repeat(256), "")).unwrap_err();
        assert!(errors["name"][0].contains("255"));
    }

    #[test]
    fn valid_form_is_trimmed() {
        let board = validate_board_form(&form("  Software Engineering Jobs ", "  ")).unwrap();
        assert_eq!(
            board,
            ValidBoard {
                name: "Software Engineering Jobs".into(),
                description: None,
            }
        );
    }

    #[test]
    fn every_status_gets_a_column_in_board_order() {
        let now = OffsetDateTime::now_utc();
        let board_id = Uuid::new_v4();
        let apps = vec![
            Application::create(board_id, fields("Google", ApplicationStatus::Offered), now),
            Application::create(board_id, fields("Acme", ApplicationStatus::Wishlist), now),
            Application::create(board_id, fields("Initech", ApplicationStatus::Wishlist), now),
        ];

        let columns = build_columns(&apps);

        let order: Vec<_> = columns.iter().map(|c| c.status).collect();
        assert_eq!(order, ApplicationStatus::ALL.to_vec());
        assert_eq!(columns[0].applications.len(), 2);
        assert_eq!(columns[0].applications[0].company, "Acme");
        assert!(columns[1].applications.is_empty());
        assert_eq!(columns[5].applications[0].company, "Google");
    }

    #[test]
    fn edit_modal_carries_delete_action() {
        let templates = Templates::new().unwrap();
        let html = render_board_modal(
            &templates,
            BoardModal {
                title: "Edit Job Board",
                action: "/api/v1/job-boards/1/update".into(),
                submit_label: "Save Changes",
                delete_action: Some("/api/v1/job-boards/1".into()),
            },
            &form("Remote", "Only remote roles"),
            &FieldErrors::new(),
        )
        .unwrap();
        assert!(html.contains("data-delete-url"));
        assert!(html.contains("Only remote roles"));
        assert!(!html.contains("is-invalid"));
    }
}
