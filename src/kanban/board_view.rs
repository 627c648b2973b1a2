//! Local copy of one board plus the drag state machine:
//! `Idle -> Dragging -> Dropped -> Confirmed | RolledBack`.

use thiserror::Error;
use uuid::Uuid;

use crate::{
    kanban::protocol::{ApplicationCard, BoardSummary, KanbanColumn, KanbanResponse},
    pipeline::ApplicationStatus,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("card {0} is not on this board")]
    UnknownCard(Uuid),
    #[error("no card is being dragged")]
    NotDragging,
    #[error("a status update is still in flight")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging {
        card: Uuid,
        from: ApplicationStatus,
    },
    /// Card already sits in `to`; the status request is in flight.
    Dropped {
        card: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    Confirmed {
        card: Uuid,
        status: ApplicationStatus,
    },
    /// The server refused or could not be reached; the view must be reloaded.
    RolledBack { card: Uuid },
}

#[derive(Debug, Clone)]
pub struct BoardView {
    board: BoardSummary,
    columns: Vec<KanbanColumn>,
    phase: DragPhase,
}

impl BoardView {
    pub fn new(snapshot: KanbanResponse) -> Self {
        Self {
            board: snapshot.board,
            columns: snapshot.columns,
            phase: DragPhase::Idle,
        }
    }

    /// Throws away every local change. The phase survives so the outcome of
    /// the last drag stays observable.
    pub fn replace(&mut self, snapshot: KanbanResponse) {
        self.board = snapshot.board;
        self.columns = snapshot.columns;
    }

    pub fn board(&self) -> &BoardSummary {
        &self.board
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn columns(&self) -> &[KanbanColumn] {
        &self.columns
    }

    pub fn column(&self, status: ApplicationStatus) -> Option<&KanbanColumn> {
        self.columns.iter().find(|c| c.status == status)
    }

    pub fn status_of(&self, card: Uuid) -> Option<ApplicationStatus> {
        self.columns
            .iter()
            .find(|c| c.applications.iter().any(|a| a.id == card))
            .map(|c| c.status)
    }

    pub fn pick_up(&mut self, card: Uuid) -> Result<(), ViewError> {
        if matches!(self.phase, DragPhase::Dropped { .. }) {
            return Err(ViewError::Busy);
        }
        let from = self.status_of(card).ok_or(ViewError::UnknownCard(card))?;
        self.phase = DragPhase::Dragging { card, from };
        Ok(())
    }

    /// Released outside any column.
    pub fn cancel_drag(&mut self) {
        if matches!(self.phase, DragPhase::Dragging { .. }) {
            self.phase = DragPhase::Idle;
        }
    }

    /// Moves the dragged card to the top of `to` right away and returns the
    /// request to send. Dropping onto the origin column still yields one.
    pub fn drop_on(&mut self, to: ApplicationStatus) -> Result<(Uuid, ApplicationStatus), ViewError> {
        let DragPhase::Dragging { card, from } = self.phase else {
            return Err(ViewError::NotDragging);
        };

        let moved = self.take_card(card).ok_or(ViewError::UnknownCard(card))?;
        self.insert_card(to, moved);
        self.phase = DragPhase::Dropped { card, from, to };
        Ok((card, to))
    }

    pub fn confirm(&mut self) {
        if let DragPhase::Dropped { card, to, .. } = self.phase {
            self.phase = DragPhase::Confirmed { card, status: to };
        }
    }

    pub fn roll_back(&mut self) {
        if let DragPhase::Dropped { card, .. } = self.phase {
            self.phase = DragPhase::RolledBack { card };
        }
    }

    fn take_card(&mut self, card: Uuid) -> Option<ApplicationCard> {
        self.columns.iter_mut().find_map(|column| {
            let idx = column.applications.iter().position(|a| a.id == card)?;
            Some(column.applications.remove(idx))
        })
    }

    fn insert_card(&mut self, status: ApplicationStatus, card: ApplicationCard) {
        match self.columns.iter_mut().find(|c| c.status == status) {
            Some(column) => column.applications.insert(0, card),
            None => self.columns.push(KanbanColumn {
                status,
                label: status.label().to_string(),
                applications: vec![card],
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use time::macros::datetime;

    pub(crate) fn card(company: &str) -> ApplicationCard {
        ApplicationCard {
            id: Uuid::new_v4(),
            company: company.into(),
            job_title: "Engineer".into(),
            location: "Remote".into(),
            salary: None,
            created_at: datetime!(2025-01-10 09:00 UTC),
        }
    }

    pub(crate) fn snapshot(cards: Vec<(ApplicationStatus, ApplicationCard)>) -> KanbanResponse {
        let columns = ApplicationStatus::ALL
            .into_iter()
            .map(|status| KanbanColumn {
                status,
                label: status.label().to_string(),
                applications: cards
                    .iter()
                    .filter(|(s, _)| *s == status)
                    .map(|(_, c)| c.clone())
                    .collect(),
            })
            .collect();
        KanbanResponse {
            board: BoardSummary {
                id: Uuid::new_v4(),
                name: "Jobs".into(),
                description: None,
                created_at: datetime!(2025-01-01 09:00 UTC),
            },
            columns,
        }
    }

    #[test]
    fn drop_moves_card_before_confirmation() {
        let google = card("Google");
        let mut view = BoardView::new(snapshot(vec![(ApplicationStatus::Wishlist, google.clone())]));

        view.pick_up(google.id).unwrap();
        assert_eq!(
            view.phase(),
            &DragPhase::Dragging {
                card: google.id,
                from: ApplicationStatus::Wishlist
            }
        );

        let request = view.drop_on(ApplicationStatus::Interview).unwrap();
        assert_eq!(request, (google.id, ApplicationStatus::Interview));
        assert_eq!(view.status_of(google.id), Some(ApplicationStatus::Interview));
        assert!(view
            .column(ApplicationStatus::Wishlist)
            .unwrap()
            .applications
            .is_empty());

        view.confirm();
        assert_eq!(
            view.phase(),
            &DragPhase::Confirmed {
                card: google.id,
                status: ApplicationStatus::Interview
            }
        );
    }

    #[test]
    fn same_column_drop_still_requests_update() {
        let google = card("Google");
        let mut view = BoardView::new(snapshot(vec![(ApplicationStatus::Applied, google.clone())]));
        view.pick_up(google.id).unwrap();
        assert_eq!(
            view.drop_on(ApplicationStatus::Applied),
            Ok((google.id, ApplicationStatus::Applied))
        );
    }

    #[test]
    fn drop_without_drag_is_rejected() {
        let mut view = BoardView::new(snapshot(vec![]));
        assert_eq!(
            view.drop_on(ApplicationStatus::Applied),
            Err(ViewError::NotDragging)
        );
        assert_eq!(
            view.pick_up(Uuid::nil()),
            Err(ViewError::UnknownCard(Uuid::nil()))
        );
    }

    #[test]
    fn second_drag_waits_for_in_flight_update() {
        let a = card("A");
        let b = card("B");
        let mut view = BoardView::new(snapshot(vec![
            (ApplicationStatus::Wishlist, a.clone()),
            (ApplicationStatus::Wishlist, b.clone()),
        ]));
        view.pick_up(a.id).unwrap();
        view.drop_on(ApplicationStatus::Applied).unwrap();

        assert_eq!(view.pick_up(b.id), Err(ViewError::Busy));
    }

    #[test]
    fn reload_after_rollback_restores_server_state() {
        let google = card("Google");
        let server = snapshot(vec![(ApplicationStatus::Wishlist, google.clone())]);
        let mut view = BoardView::new(server.clone());

        view.pick_up(google.id).unwrap();
        view.drop_on(ApplicationStatus::Offered).unwrap();
        view.roll_back();
        view.replace(server);

        assert_eq!(view.phase(), &DragPhase::RolledBack { card: google.id });
        assert_eq!(view.status_of(google.id), Some(ApplicationStatus::Wishlist));
    }
}
