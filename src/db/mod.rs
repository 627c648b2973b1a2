//! Persistence seam. Handlers only see `Arc<dyn Store>`; every board and
//! application lookup is scoped by owner in a single call so that "missing"
//! and "not yours" are indistinguishable.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    applications::repo_types::Application,
    auth::repo_types::{NewUser, User},
    boards::repo_types::Board,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User>;
    async fn update_user_name(&self, id: Uuid, name: &str) -> anyhow::Result<()>;
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()>;

    async fn create_board(&self, board: &Board) -> anyhow::Result<()>;
    async fn find_board(&self, id: Uuid, owner: Uuid) -> anyhow::Result<Option<Board>>;
    /// Newest first; `limit` of `None` returns every board.
    async fn list_boards(&self, owner: Uuid, limit: Option<i64>) -> anyhow::Result<Vec<Board>>;
    async fn count_boards(&self, owner: Uuid) -> anyhow::Result<i64>;
    async fn update_board(&self, board: &Board) -> anyhow::Result<()>;
    /// Removes the board and all of its applications. `false` when nothing
    /// owned by `owner` matched.
    async fn delete_board(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool>;

    async fn create_application(&self, application: &Application) -> anyhow::Result<()>;
    async fn find_application(&self, id: Uuid, owner: Uuid)
        -> anyhow::Result<Option<Application>>;
    /// Newest first.
    async fn list_applications_for_board(&self, board_id: Uuid)
        -> anyhow::Result<Vec<Application>>;
    async fn list_applications_for_user(&self, owner: Uuid) -> anyhow::Result<Vec<Application>>;
    /// Writes every column of the row; the last writer wins.
    async fn save_application(&self, application: &Application) -> anyhow::Result<()>;
    async fn delete_application(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool>;
}
