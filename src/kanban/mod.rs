//! Client half of the board sync protocol.

pub mod api;
pub mod board_view;
pub mod controller;
pub mod details;
pub mod notify;
pub mod protocol;

pub use api::{BoardApi, ClientError, HttpBoardApi};
pub use board_view::{BoardView, DragPhase};
pub use controller::KanbanController;
pub use notify::{Notifier, Toast, ToastKind, ToastLog};
