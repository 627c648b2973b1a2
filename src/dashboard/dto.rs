use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{kanban::protocol::BoardSummary, pipeline::ApplicationStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub label: String,
    pub count: usize,
}

/// An open application nobody has touched for a while.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleApplication {
    pub id: Uuid,
    pub board_id: Uuid,
    pub company: String,
    pub job_title: String,
    pub status: ApplicationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub last_activity_at: OffsetDateTime,
    pub idle_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub has_job_boards: bool,
    pub board_count: i64,
    pub total_applications: usize,
    pub status_counts: Vec<StatusCount>,
    pub applied_count: usize,
    pub interview_count: usize,
    pub stale_applications: Vec<StaleApplication>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_activity_at: Option<OffsetDateTime>,
    pub recent_boards: Vec<BoardSummary>,
}
