use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Html,
    routing::{delete, get, patch, post},
    Form, Json, Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    applications::{
        dto::ApplicationForm,
        repo_types::Application,
        services::{render_application_modal, validate_application_form, ApplicationModal},
    },
    auth::jwt::AuthUser,
    boards::handlers::owned_board,
    error::AppError,
    forms::{rejected, saved, FieldErrors, FormReply},
    pipeline::PipelineError,
    kanban::protocol::{
        paths, ApplicationDetails, DeleteResponse, StatusSnapshot, StatusUpdateRequest,
        StatusUpdateResponse,
    },
    state::AppState,
};

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/job-boards/:id/_fragment/application-modal",
            get(create_modal),
        )
        .route("/job-boards/:id/applications", post(create_application))
        .route("/applications/:id/details", get(details))
        .route("/applications/:id/status", patch(update_status))
        .route("/applications/:id/_fragment/edit-modal", get(edit_modal))
        .route("/applications/:id/update", post(update_application))
        .route("/applications/:id", delete(delete_application))
}

async fn owned_application(
    state: &AppState,
    id: Uuid,
    owner: Uuid,
) -> Result<Application, AppError> {
    state
        .store
        .find_application(id, owner)
        .await?
        .ok_or(AppError::NotFound("Application"))
}

fn create_modal_layout(board_id: Uuid, board_name: &str) -> ApplicationModal<'_> {
    ApplicationModal {
        title: "Add Job Application",
        action: paths::create_application(board_id),
        submit_label: "Add Application",
        board_name: Some(board_name),
        delete_action: None,
    }
}

fn edit_modal_layout(id: Uuid) -> ApplicationModal<'static> {
    ApplicationModal {
        title: "Edit Job Application",
        action: paths::update_application(id),
        submit_label: "Save Changes",
        board_name: None,
        delete_action: Some(paths::delete_application(id)),
    }
}

/// Anything other than a JSON object with a string `status` reads as an
/// invalid status, including a body that is not JSON at all.
fn requested_status(payload: Result<Json<Value>, JsonRejection>) -> Result<String, PipelineError> {
    let Json(body) = payload.map_err(|e| PipelineError::InvalidStatus(e.body_text()))?;
    serde_json::from_value::<StatusUpdateRequest>(body)
        .map(|request| request.status)
        .map_err(|e| PipelineError::InvalidStatus(e.to_string()))
}

fn snapshot(application: &Application) -> StatusSnapshot {
    StatusSnapshot {
        id: application.id,
        status: application.status,
    }
}

#[instrument(skip(state))]
pub async fn create_modal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(board_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let board = owned_board(&state, board_id, user_id).await?;
    let html = render_application_modal(
        &state.templates,
        create_modal_layout(board.id, &board.name),
        &ApplicationForm::default(),
        &FieldErrors::new(),
    )?;
    Ok(Html(html))
}

#[instrument(skip(state, form))]
pub async fn create_application(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(board_id): Path<Uuid>,
    Form(form): Form<ApplicationForm>,
) -> Result<FormReply, AppError> {
    let board = owned_board(&state, board_id, user_id).await?;

    let fields = match validate_application_form(&form) {
        Ok(fields) => fields,
        Err(errors) => {
            warn!(user_id = %user_id, board_id = %board.id, fields = ?errors.keys(), "application form rejected");
            let modal = render_application_modal(
                &state.templates,
                create_modal_layout(board.id, &board.name),
                &form,
                &errors,
            )?;
            return Ok(rejected(modal));
        }
    };

    let application = Application::create(board.id, fields, OffsetDateTime::now_utc());
    state.store.create_application(&application).await?;

    info!(
        user_id = %user_id,
        board_id = %board.id,
        application_id = %application.id,
        status = %application.status,
        "job application created"
    );
    Ok(saved(
        StatusCode::CREATED,
        "Job application created successfully!",
        Some(snapshot(&application)),
    ))
}

#[instrument(skip(state))]
pub async fn details(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetails>, AppError> {
    let application = owned_application(&state, id, user_id).await?;
    Ok(Json(ApplicationDetails::from(&application)))
}

/// Moves an application to another column. The owner lookup runs first, so a
/// foreign id answers 404 whatever the requested status.
#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<StatusUpdateResponse>, AppError> {
    let mut application = owned_application(&state, id, user_id).await?;
    let previous = application.status;

    let next = requested_status(payload)
        .and_then(|raw| application.apply_status(&raw, OffsetDateTime::now_utc()))
        .map_err(|e| {
            warn!(user_id = %user_id, application_id = %id, error = %e, "invalid status");
            AppError::from(e)
        })?;
    state.store.save_application(&application).await?;

    info!(
        user_id = %user_id,
        application_id = %id,
        from = %previous,
        to = %next,
        "application status updated"
    );
    Ok(Json(StatusUpdateResponse {
        success: true,
        message: Some("Status updated successfully".into()),
        application: Some(snapshot(&application)),
    }))
}

#[instrument(skip(state))]
pub async fn edit_modal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let application = owned_application(&state, id, user_id).await?;
    let html = render_application_modal(
        &state.templates,
        edit_modal_layout(id),
        &ApplicationForm::from(&application),
        &FieldErrors::new(),
    )?;
    Ok(Html(html))
}

#[instrument(skip(state, form))]
pub async fn update_application(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Form(form): Form<ApplicationForm>,
) -> Result<FormReply, AppError> {
    let mut application = owned_application(&state, id, user_id).await?;

    let fields = match validate_application_form(&form) {
        Ok(fields) => fields,
        Err(errors) => {
            warn!(user_id = %user_id, application_id = %id, fields = ?errors.keys(), "application form rejected");
            let modal =
                render_application_modal(&state.templates, edit_modal_layout(id), &form, &errors)?;
            return Ok(rejected(modal));
        }
    };

    application.update(fields, OffsetDateTime::now_utc());
    state.store.save_application(&application).await?;

    info!(user_id = %user_id, application_id = %id, status = %application.status, "job application updated");
    Ok(saved(
        StatusCode::OK,
        "Job application updated successfully!",
        Some(snapshot(&application)),
    ))
}

#[instrument(skip(state))]
pub async fn delete_application(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    if !state.store.delete_application(id, user_id).await? {
        return Err(AppError::NotFound("Application"));
    }

    info!(user_id = %user_id, application_id = %id, "job application deleted");
    Ok(Json(DeleteResponse {
        success: true,
        message: Some("Application deleted successfully".into()),
    }))
}
