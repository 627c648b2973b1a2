use axum::{extract::State, routing::get, Json, Router};
use time::{Duration, OffsetDateTime};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    dashboard::{dto::DashboardResponse, services::summarize},
    error::AppError,
    kanban::protocol::BoardSummary,
    pipeline::ApplicationStatus,
    state::AppState,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let board_count = state.store.count_boards(user_id).await?;
    let recent = state
        .store
        .list_boards(user_id, Some(state.config.recent_boards_limit))
        .await?;
    let applications = state.store.list_applications_for_user(user_id).await?;

    let stats = summarize(
        &applications,
        OffsetDateTime::now_utc(),
        Duration::days(state.config.stale_after_days),
    );

    Ok(Json(DashboardResponse {
        has_job_boards: board_count > 0,
        board_count,
        total_applications: stats.total,
        applied_count: stats.count(ApplicationStatus::Applied),
        interview_count: stats.count(ApplicationStatus::Interview),
        status_counts: stats.status_counts,
        stale_applications: stats.stale,
        last_activity_at: stats.last_activity_at,
        recent_boards: recent.iter().map(BoardSummary::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        applications::repo_types::{tests::fields, Application},
        auth::handlers::tests::register_user,
        boards::handlers::tests::create_board_for,
    };

    #[tokio::test]
    async fn new_user_has_empty_dashboard() {
        let state = AppState::fake();
        let user = register_user(&state, "owner@example.com").await.user;

        let Json(res) = dashboard(State(state.clone()), AuthUser(user.id))
            .await
            .unwrap();

        assert!(!res.has_job_boards);
        assert_eq!(res.total_applications, 0);
        assert!(res.recent_boards.is_empty());
        assert!(res.last_activity_at.is_none());
    }

    #[tokio::test]
    async fn counts_only_the_callers_applications() {
        let state = AppState::fake();
        let user = register_user(&state, "owner@example.com").await.user;
        let other = register_user(&state, "other@example.com").await.user;
        let mine = create_board_for(&state, user.id, "Mine").await;
        let theirs = create_board_for(&state, other.id, "Theirs").await;

        let now = OffsetDateTime::now_utc();
        for (board, status) in [
            (mine.id, ApplicationStatus::Applied),
            (mine.id, ApplicationStatus::Interview),
            (mine.id, ApplicationStatus::Applied),
            (theirs.id, ApplicationStatus::Applied),
        ] {
            let app = Application::create(board, fields("Acme", status), now);
            state.store.create_application(&app).await.unwrap();
        }

        let Json(res) = dashboard(State(state.clone()), AuthUser(user.id))
            .await
            .unwrap();

        assert!(res.has_job_boards);
        assert_eq!(res.board_count, 1);
        assert_eq!(res.total_applications, 3);
        assert_eq!(res.applied_count, 2);
        assert_eq!(res.interview_count, 1);
        assert!(res.stale_applications.is_empty());
        assert_eq!(res.recent_boards[0].name, "Mine");
    }
}
