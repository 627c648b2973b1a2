//! Shared plumbing for the form-encoded create/update endpoints.

use std::collections::BTreeMap;

use axum::{http::StatusCode, Json};

use crate::kanban::protocol::{FormResponse, StatusSnapshot};

pub const FORM_INVALID_MESSAGE: &str = "Please fix the form errors and try again.";

/// Field name to messages, rendered inline under each input.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

pub type FormReply = (StatusCode, Json<FormResponse>);

pub(crate) fn push_error(errors: &mut FieldErrors, field: &'static str, message: impl Into<String>) {
    errors.entry(field).or_default().push(message.into());
}

/// Trimmed value, `None` when blank.
pub(crate) fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn saved(
    status: StatusCode,
    message: &str,
    application: Option<StatusSnapshot>,
) -> FormReply {
    (
        status,
        Json(FormResponse {
            success: true,
            message: Some(message.to_string()),
            modal: None,
            application,
        }),
    )
}

pub(crate) fn rejected(modal: String) -> FormReply {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(FormResponse {
            success: false,
            message: Some(FORM_INVALID_MESSAGE.to_string()),
            modal: Some(modal),
            application: None,
        }),
    )
}
