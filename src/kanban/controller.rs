//! Drives one kanban page: drag and drop, the form modals, deletes and the
//! details modal. Every action takes `&mut self`, so at most one request per
//! controller is in flight.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    kanban::{
        api::{BoardApi, ClientError},
        board_view::{BoardView, ViewError},
        details::{self, RenderError},
        notify::{Notifier, Toast},
        protocol::paths,
    },
    pipeline::ApplicationStatus,
    templates::Templates,
};

pub const STATUS_UPDATED: &str = "Application status updated successfully";
pub const STATUS_FAILED: &str = "Failed to update status";
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";
pub const FORM_LOAD_FAILED: &str = "Failed to load form. Please try again.";
pub const SAVED: &str = "Saved successfully!";
pub const FIX_ERRORS: &str = "Please fix the errors and try again.";
pub const DELETED: &str = "Deleted successfully";
pub const BOARD_LOAD_FAILED: &str = "Failed to load board. Please refresh the page.";
pub const DETAILS_LOAD_FAILED: &str = "Failed to load application details.";
pub const SAVING_LABEL: &str = "Saving...";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("board is not loaded")]
    NotLoaded,
    #[error("no modal is open")]
    NoModal,
    #[error("form is not bound to a submit handler")]
    FormNotBound,
    #[error("a submission is already in flight")]
    Busy,
    #[error("no delete is awaiting confirmation")]
    NoPendingDelete,
    #[error("no details modal is open")]
    NoDetails,
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    CreateBoard,
    EditBoard(Uuid),
    CreateApplication,
    EditApplication(Uuid),
}

impl ModalKind {
    fn fragment_path(self, board_id: Uuid) -> String {
        match self {
            Self::CreateBoard => paths::create_board_modal(),
            Self::EditBoard(id) => paths::edit_board_modal(id),
            Self::CreateApplication => paths::create_application_modal(board_id),
            Self::EditApplication(id) => paths::edit_application_modal(id),
        }
    }

    fn action_path(self, board_id: Uuid) -> String {
        match self {
            Self::CreateBoard => paths::create_board(),
            Self::EditBoard(id) => paths::update_board(id),
            Self::CreateApplication => paths::create_application(board_id),
            Self::EditApplication(id) => paths::update_application(id),
        }
    }

    fn edits(self, target: DeleteTarget) -> bool {
        match (self, target) {
            (Self::EditBoard(a), DeleteTarget::Board(b)) => a == b,
            (Self::EditApplication(a), DeleteTarget::Application(b)) => a == b,
            _ => false,
        }
    }
}

/// An open form modal. Each injected body gets a new revision and must be
/// bound again before it can be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormModal {
    kind: ModalKind,
    body: String,
    action: String,
    revision: u32,
    bound_revision: Option<u32>,
}

impl FormModal {
    fn open(kind: ModalKind, body: String, action: String) -> Self {
        let mut modal = Self {
            kind,
            body,
            action,
            revision: 1,
            bound_revision: None,
        };
        modal.bind();
        modal
    }

    fn replace_body(&mut self, body: String) {
        self.body = body;
        self.revision += 1;
        self.bound_revision = None;
    }

    fn bind(&mut self) {
        self.bound_revision = Some(self.revision);
    }

    pub fn kind(&self) -> ModalKind {
        self.kind
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn is_bound(&self) -> bool {
        self.bound_revision == Some(self.revision)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsModal {
    pub application_id: Uuid,
    pub html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Board(Uuid),
    Application(Uuid),
}

impl DeleteTarget {
    fn path(self) -> String {
        match self {
            Self::Board(id) => paths::delete_board(id),
            Self::Application(id) => paths::delete_application(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmitButton {
    idle_label: String,
    label: String,
    disabled: bool,
}

impl SubmitButton {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            idle_label: label.clone(),
            label,
            disabled: false,
        }
    }

    /// Disables the button until the returned guard is dropped.
    pub fn begin(&mut self) -> Result<SubmitGuard<'_>, ControllerError> {
        if self.disabled {
            return Err(ControllerError::Busy);
        }
        self.disabled = true;
        self.label = SAVING_LABEL.to_string();
        Ok(SubmitGuard { button: self })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

pub struct SubmitGuard<'a> {
    button: &'a mut SubmitButton,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.button.disabled = false;
        self.button.label = self.button.idle_label.clone();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Confirmed,
    RolledBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    /// The modal now shows the server's re-rendered form.
    Invalid,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed,
}

pub struct KanbanController<A, N> {
    api: A,
    notifier: N,
    templates: Arc<Templates>,
    board_id: Uuid,
    view: Option<BoardView>,
    modal: Option<FormModal>,
    details: Option<DetailsModal>,
    pending_delete: Option<DeleteTarget>,
    submit: SubmitButton,
}

impl<A: BoardApi, N: Notifier> KanbanController<A, N> {
    pub fn new(api: A, notifier: N, templates: Arc<Templates>, board_id: Uuid) -> Self {
        Self {
            api,
            notifier,
            templates,
            board_id,
            view: None,
            modal: None,
            details: None,
            pending_delete: None,
            submit: SubmitButton::new("Save"),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn view(&self) -> Option<&BoardView> {
        self.view.as_ref()
    }

    pub fn modal(&self) -> Option<&FormModal> {
        self.modal.as_ref()
    }

    pub fn details(&self) -> Option<&DetailsModal> {
        self.details.as_ref()
    }

    pub fn submit_button(&self) -> &SubmitButton {
        &self.submit
    }

    pub fn pending_delete(&self) -> Option<DeleteTarget> {
        self.pending_delete
    }

    /// Fetches the whole board and replaces the local view.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.api.load_board(self.board_id).await {
            Ok(snapshot) => {
                match self.view.as_mut() {
                    Some(view) => view.replace(snapshot),
                    None => self.view = Some(BoardView::new(snapshot)),
                }
                Ok(())
            }
            Err(error) => {
                warn!(board_id = %self.board_id, %error, "board load failed");
                self.notifier.notify(Toast::error(BOARD_LOAD_FAILED));
                Err(error)
            }
        }
    }

    async fn refresh(&mut self) {
        if let Err(error) = self.load().await {
            debug!(%error, "refresh failed");
        }
    }

    fn view_mut(&mut self) -> Result<&mut BoardView, ControllerError> {
        self.view.as_mut().ok_or(ControllerError::NotLoaded)
    }

    pub fn pick_up(&mut self, card: Uuid) -> Result<(), ControllerError> {
        self.view_mut()?.pick_up(card)?;
        Ok(())
    }

    pub fn cancel_drag(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.cancel_drag();
        }
    }

    /// Drops the dragged card on the column for `to`. The card moves before
    /// the server answers; any failure reloads the whole board.
    pub async fn drop_on(&mut self, to: ApplicationStatus) -> Result<DragOutcome, ControllerError> {
        let (card, status) = self.view_mut()?.drop_on(to)?;

        let result = self.api.update_status(card, status).await;
        let failure = match result {
            Ok(res) if res.success => {
                self.view_mut()?.confirm();
                info!(application_id = %card, %status, "status confirmed");
                self.notifier.notify(Toast::success(STATUS_UPDATED));
                return Ok(DragOutcome::Confirmed);
            }
            Ok(res) => res.message.unwrap_or_else(|| STATUS_FAILED.to_string()),
            Err(error) => {
                warn!(application_id = %card, %error, "status update transport failure");
                GENERIC_FAILURE.to_string()
            }
        };

        self.notifier.notify(Toast::error(failure));
        self.view_mut()?.roll_back();
        self.refresh().await;
        Ok(DragOutcome::RolledBack)
    }

    pub async fn open_modal(&mut self, kind: ModalKind) -> Result<(), ControllerError> {
        if matches!(kind, ModalKind::EditApplication(_)) {
            self.details = None;
        }

        let result = self.api.fetch_fragment(&kind.fragment_path(self.board_id)).await;
        match result {
            Ok(body) => {
                self.modal = Some(FormModal::open(kind, body, kind.action_path(self.board_id)));
                Ok(())
            }
            Err(error) => {
                warn!(?kind, %error, "modal fragment load failed");
                self.notifier.notify(Toast::error(FORM_LOAD_FAILED));
                Err(error.into())
            }
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub async fn submit_modal(
        &mut self,
        fields: Vec<(String, String)>,
    ) -> Result<SubmitOutcome, ControllerError> {
        let modal = self.modal.as_ref().ok_or(ControllerError::NoModal)?;
        if !modal.is_bound() {
            return Err(ControllerError::FormNotBound);
        }
        let action = modal.action.clone();

        let result = {
            let _busy = self.submit.begin()?;
            self.api.submit_form(&action, &fields).await
        };

        match result {
            Ok(res) if res.success => {
                self.modal = None;
                self.notifier
                    .notify(Toast::success(res.message.unwrap_or_else(|| SAVED.to_string())));
                self.refresh().await;
                Ok(SubmitOutcome::Saved)
            }
            Ok(res) => match (res.modal, self.modal.as_mut()) {
                (Some(body), Some(modal)) => {
                    modal.replace_body(body);
                    modal.bind();
                    self.notifier.notify(Toast::error(FIX_ERRORS));
                    Ok(SubmitOutcome::Invalid)
                }
                _ => {
                    self.notifier.notify(Toast::error(
                        res.message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
                    ));
                    Ok(SubmitOutcome::Failed)
                }
            },
            Err(error) => {
                warn!(%action, %error, "form submit transport failure");
                self.notifier.notify(Toast::error(GENERIC_FAILURE));
                Ok(SubmitOutcome::Failed)
            }
        }
    }

    /// Asks for confirmation; nothing is sent yet.
    pub fn request_delete(&mut self, target: DeleteTarget) {
        self.pending_delete = Some(target);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) -> Result<DeleteOutcome, ControllerError> {
        let target = self
            .pending_delete
            .take()
            .ok_or(ControllerError::NoPendingDelete)?;

        let result = self.api.delete(&target.path()).await;
        match result {
            Ok(res) if res.success => {
                if self.modal.as_ref().is_some_and(|m| m.kind.edits(target)) {
                    self.modal = None;
                }
                self.notifier
                    .notify(Toast::success(res.message.unwrap_or_else(|| DELETED.to_string())));
                match target {
                    DeleteTarget::Board(id) if id == self.board_id => self.view = None,
                    _ => self.refresh().await,
                }
                Ok(DeleteOutcome::Deleted)
            }
            Ok(res) => {
                self.notifier.notify(Toast::error(
                    res.message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
                ));
                Ok(DeleteOutcome::Failed)
            }
            Err(error) => {
                warn!(?target, %error, "delete transport failure");
                self.notifier.notify(Toast::error(GENERIC_FAILURE));
                Ok(DeleteOutcome::Failed)
            }
        }
    }

    pub async fn show_details(&mut self, application_id: Uuid) -> Result<(), ControllerError> {
        let record = match self.api.application_details(application_id).await {
            Ok(record) => record,
            Err(error) => {
                warn!(%application_id, %error, "details load failed");
                self.notifier.notify(Toast::error(DETAILS_LOAD_FAILED));
                return Err(error.into());
            }
        };
        let html = details::render(&self.templates, &record)?;
        self.details = Some(DetailsModal {
            application_id,
            html,
        });
        Ok(())
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }

    /// The details modal's edit button.
    pub async fn edit_from_details(&mut self) -> Result<(), ControllerError> {
        let id = self
            .details
            .as_ref()
            .map(|d| d.application_id)
            .ok_or(ControllerError::NoDetails)?;
        self.open_modal(ModalKind::EditApplication(id)).await
    }
}
