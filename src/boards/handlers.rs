use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{delete, get, post},
    Form, Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    boards::{
        dto::BoardForm,
        repo_types::Board,
        services::{build_columns, render_board_modal, validate_board_form, BoardModal},
    },
    error::AppError,
    forms::{rejected, saved, FieldErrors, FormReply},
    kanban::protocol::{paths, BoardSummary, DeleteResponse, KanbanResponse},
    state::AppState,
};

pub fn board_routes() -> Router<AppState> {
    Router::new()
        .route("/job-boards", get(list_boards).post(create_board))
        .route("/job-boards/recent", get(recent_boards))
        .route("/job-boards/_fragment/create-modal", get(create_modal))
        .route("/job-boards/:id/_fragment/edit-modal", get(edit_modal))
        .route("/job-boards/:id/update", post(update_board))
        .route("/job-boards/:id", delete(delete_board))
        .route("/job-boards/:id/kanban", get(kanban))
}

pub(crate) async fn owned_board(state: &AppState, id: Uuid, owner: Uuid) -> Result<Board, AppError> {
    state
        .store
        .find_board(id, owner)
        .await?
        .ok_or(AppError::NotFound("Job board"))
}

fn create_modal_layout() -> BoardModal<'static> {
    BoardModal {
        title: "Create Job Board",
        action: paths::create_board(),
        submit_label: "Create Board",
        delete_action: None,
    }
}

fn edit_modal_layout(id: Uuid) -> BoardModal<'static> {
    BoardModal {
        title: "Edit Job Board",
        action: paths::update_board(id),
        submit_label: "Save Changes",
        delete_action: Some(paths::delete_board(id)),
    }
}

#[instrument(skip(state))]
pub async fn list_boards(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<BoardSummary>>, AppError> {
    let boards = state.store.list_boards(user_id, None).await?;
    Ok(Json(boards.iter().map(BoardSummary::from).collect()))
}

#[instrument(skip(state))]
pub async fn recent_boards(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<BoardSummary>>, AppError> {
    let limit = Some(state.config.recent_boards_limit);
    let boards = state.store.list_boards(user_id, limit).await?;
    Ok(Json(boards.iter().map(BoardSummary::from).collect()))
}

#[instrument(skip(state))]
pub async fn create_modal(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Html<String>, AppError> {
    let html = render_board_modal(
        &state.templates,
        create_modal_layout(),
        &BoardForm::default(),
        &FieldErrors::new(),
    )?;
    Ok(Html(html))
}

#[instrument(skip(state, form))]
pub async fn create_board(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Form(form): Form<BoardForm>,
) -> Result<FormReply, AppError> {
    let valid = match validate_board_form(&form) {
        Ok(valid) => valid,
        Err(errors) => {
            warn!(user_id = %user_id, fields = ?errors.keys(), "board form rejected");
            let modal = render_board_modal(&state.templates, create_modal_layout(), &form, &errors)?;
            return Ok(rejected(modal));
        }
    };

    let board = Board::new(user_id, valid.name, valid.description);
    state.store.create_board(&board).await?;

    info!(user_id = %user_id, board_id = %board.id, "job board created");
    Ok(saved(StatusCode::CREATED, "Job board created successfully!", None))
}

#[instrument(skip(state))]
pub async fn edit_modal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let board = owned_board(&state, id, user_id).await?;
    let form = BoardForm {
        name: board.name,
        description: board.description.unwrap_or_default(),
    };
    let html = render_board_modal(
        &state.templates,
        edit_modal_layout(id),
        &form,
        &FieldErrors::new(),
    )?;
    Ok(Html(html))
}

#[instrument(skip(state, form))]
pub async fn update_board(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Form(form): Form<BoardForm>,
) -> Result<FormReply, AppError> {
    let mut board = owned_board(&state, id, user_id).await?;

    let valid = match validate_board_form(&form) {
        Ok(valid) => valid,
        Err(errors) => {
            warn!(user_id = %user_id, board_id = %id, fields = ?errors.keys(), "board form rejected");
            let modal = render_board_modal(&state.templates, edit_modal_layout(id), &form, &errors)?;
            return Ok(rejected(modal));
        }
    };

    board.name = valid.name;
    board.description = valid.description;
    state.store.update_board(&board).await?;

    info!(user_id = %user_id, board_id = %id, "job board updated");
    Ok(saved(StatusCode::OK, "Job board updated successfully!", None))
}

#[instrument(skip(state))]
pub async fn delete_board(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    if !state.store.delete_board(id, user_id).await? {
        return Err(AppError::NotFound("Job board"));
    }

    info!(user_id = %user_id, board_id = %id, "job board deleted");
    Ok(Json(DeleteResponse {
        success: true,
        message: Some("Job board deleted successfully".into()),
    }))
}

#[instrument(skip(state))]
pub async fn kanban(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<KanbanResponse>, AppError> {
    let board = owned_board(&state, id, user_id).await?;
    let applications = state.store.list_applications_for_board(board.id).await?;

    Ok(Json(KanbanResponse {
        board: BoardSummary::from(&board),
        columns: build_columns(&applications),
    }))
}
