//! Wire contract between the kanban client and the HTTP surface. Both sides
//! use these types, so a field renamed here is renamed everywhere.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    applications::repo_types::Application, boards::repo_types::Board,
    pipeline::ApplicationStatus,
};

pub const API_PREFIX: &str = "/api/v1";

/// Concrete request paths, relative to the server root.
pub mod paths {
    use uuid::Uuid;

    use super::API_PREFIX;

    pub fn kanban(board_id: Uuid) -> String {
        format!("{API_PREFIX}/job-boards/{board_id}/kanban")
    }

    pub fn create_board_modal() -> String {
        format!("{API_PREFIX}/job-boards/_fragment/create-modal")
    }

    pub fn create_board() -> String {
        format!("{API_PREFIX}/job-boards")
    }

    pub fn edit_board_modal(board_id: Uuid) -> String {
        format!("{API_PREFIX}/job-boards/{board_id}/_fragment/edit-modal")
    }

    pub fn update_board(board_id: Uuid) -> String {
        format!("{API_PREFIX}/job-boards/{board_id}/update")
    }

    pub fn delete_board(board_id: Uuid) -> String {
        format!("{API_PREFIX}/job-boards/{board_id}")
    }

    pub fn create_application_modal(board_id: Uuid) -> String {
        format!("{API_PREFIX}/job-boards/{board_id}/_fragment/application-modal")
    }

    pub fn create_application(board_id: Uuid) -> String {
        format!("{API_PREFIX}/job-boards/{board_id}/applications")
    }

    pub fn application_details(id: Uuid) -> String {
        format!("{API_PREFIX}/applications/{id}/details")
    }

    pub fn application_status(id: Uuid) -> String {
        format!("{API_PREFIX}/applications/{id}/status")
    }

    pub fn edit_application_modal(id: Uuid) -> String {
        format!("{API_PREFIX}/applications/{id}/_fragment/edit-modal")
    }

    pub fn update_application(id: Uuid) -> String {
        format!("{API_PREFIX}/applications/{id}/update")
    }

    pub fn delete_application(id: Uuid) -> String {
        format!("{API_PREFIX}/applications/{id}")
    }
}

/// Body of `PATCH /applications/:id/status`. Kept as a raw string so the
/// server, not the deserializer, decides what counts as a valid status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub id: Uuid,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<StatusSnapshot>,
}

/// Answer to a create or update form post. `modal` carries the re-rendered
/// form and is only present when validation failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<StatusSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Board> for BoardSummary {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id,
            name: board.name.clone(),
            description: board.description.clone(),
            created_at: board.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCard {
    pub id: Uuid,
    pub company: String,
    pub job_title: String,
    pub location: String,
    pub salary: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Application> for ApplicationCard {
    fn from(a: &Application) -> Self {
        Self {
            id: a.id,
            company: a.company.clone(),
            job_title: a.job_title.clone(),
            location: a.location.clone(),
            salary: a.salary.clone(),
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanColumn {
    pub status: ApplicationStatus,
    pub label: String,
    pub applications: Vec<ApplicationCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanResponse {
    pub board: BoardSummary,
    pub columns: Vec<KanbanColumn>,
}

/// Full record returned by the details endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetails {
    pub id: Uuid,
    pub company: String,
    pub job_title: String,
    pub location: String,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub description: String,
    pub status: ApplicationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub applied_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub interviewed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub offered_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub rejected_at: Option<OffsetDateTime>,
}

impl From<&Application> for ApplicationDetails {
    fn from(a: &Application) -> Self {
        Self {
            id: a.id,
            company: a.company.clone(),
            job_title: a.job_title.clone(),
            location: a.location.clone(),
            url: a.url.clone(),
            salary: a.salary.clone(),
            description: a.description.clone(),
            status: a.status,
            created_at: a.created_at,
            applied_at: a.milestones.applied_at,
            interviewed_at: a.milestones.interviewed_at,
            offered_at: a.milestones.offered_at,
            rejected_at: a.milestones.rejected_at,
        }
    }
}
