use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::{
    applications::repo_types::Application,
    auth::repo_types::{NewUser, User},
    boards::repo_types::Board,
};

/// In-process store with the same ownership and cascade rules as Postgres.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    boards: HashMap<Uuid, Board>,
    applications: HashMap<Uuid, Application>,
}

impl Tables {
    fn owns_board(&self, board_id: Uuid, owner: Uuid) -> bool {
        self.boards
            .get(&board_id)
            .is_some_and(|b| b.user_id == owner)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> OffsetDateTime) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let t = self.inner.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let mut t = self.inner.write().await;
        anyhow::ensure!(
            !t.users.values().any(|u| u.email == new.email),
            "email already registered"
        );
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            roles: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user_name(&self, id: Uuid, name: &str) -> anyhow::Result<()> {
        let mut t = self.inner.write().await;
        if let Some(user) = t.users.get_mut(&id) {
            user.name = name.to_string();
        }
        Ok(())
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        let mut t = self.inner.write().await;
        if let Some(user) = t.users.get_mut(&id) {
            user.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn create_board(&self, board: &Board) -> anyhow::Result<()> {
        let mut t = self.inner.write().await;
        anyhow::ensure!(t.users.contains_key(&board.user_id), "unknown board owner");
        t.boards.insert(board.id, board.clone());
        Ok(())
    }

    async fn find_board(&self, id: Uuid, owner: Uuid) -> anyhow::Result<Option<Board>> {
        let t = self.inner.read().await;
        Ok(t.boards.get(&id).filter(|b| b.user_id == owner).cloned())
    }

    async fn list_boards(&self, owner: Uuid, limit: Option<i64>) -> anyhow::Result<Vec<Board>> {
        let t = self.inner.read().await;
        let mut boards: Vec<Board> = t
            .boards
            .values()
            .filter(|b| b.user_id == owner)
            .cloned()
            .collect();
        newest_first(&mut boards, |b| b.created_at);
        if let Some(limit) = limit {
            boards.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        }
        Ok(boards)
    }

    async fn count_boards(&self, owner: Uuid) -> anyhow::Result<i64> {
        let t = self.inner.read().await;
        let count = t.boards.values().filter(|b| b.user_id == owner).count();
        Ok(i64::try_from(count)?)
    }

    async fn update_board(&self, board: &Board) -> anyhow::Result<()> {
        let mut t = self.inner.write().await;
        if let Some(stored) = t
            .boards
            .get_mut(&board.id)
            .filter(|b| b.user_id == board.user_id)
        {
            stored.name = board.name.clone();
            stored.description = board.description.clone();
        }
        Ok(())
    }

    async fn delete_board(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool> {
        let mut t = self.inner.write().await;
        if !t.owns_board(id, owner) {
            return Ok(false);
        }
        t.boards.remove(&id);
        t.applications.retain(|_, a| a.board_id != id);
        Ok(true)
    }

    async fn create_application(&self, application: &Application) -> anyhow::Result<()> {
        let mut t = self.inner.write().await;
        anyhow::ensure!(
            t.boards.contains_key(&application.board_id),
            "unknown board"
        );
        t.applications.insert(application.id, application.clone());
        Ok(())
    }

    async fn find_application(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> anyhow::Result<Option<Application>> {
        let t = self.inner.read().await;
        Ok(t.applications
            .get(&id)
            .filter(|a| t.owns_board(a.board_id, owner))
            .cloned())
    }

    async fn list_applications_for_board(
        &self,
        board_id: Uuid,
    ) -> anyhow::Result<Vec<Application>> {
        let t = self.inner.read().await;
        let mut apps: Vec<Application> = t
            .applications
            .values()
            .filter(|a| a.board_id == board_id)
            .cloned()
            .collect();
        newest_first(&mut apps, |a| a.created_at);
        Ok(apps)
    }

    async fn list_applications_for_user(&self, owner: Uuid) -> anyhow::Result<Vec<Application>> {
        let t = self.inner.read().await;
        let mut apps: Vec<Application> = t
            .applications
            .values()
            .filter(|a| t.owns_board(a.board_id, owner))
            .cloned()
            .collect();
        newest_first(&mut apps, |a| a.created_at);
        Ok(apps)
    }

    async fn save_application(&self, application: &Application) -> anyhow::Result<()> {
        let mut t = self.inner.write().await;
        if let Some(stored) = t.applications.get_mut(&application.id) {
            *stored = application.clone();
        }
        Ok(())
    }

    async fn delete_application(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool> {
        let mut t = self.inner.write().await;
        let owned = t
            .applications
            .get(&id)
            .is_some_and(|a| t.owns_board(a.board_id, owner));
        if owned {
            t.applications.remove(&id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        applications::repo_types::tests::fields, pipeline::ApplicationStatus,
    };

    async fn user(store: &MemoryStore, email: &str) -> User {
        store
            .create_user(NewUser {
                email: email.into(),
                name: "Test User".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn application_lookup_is_scoped_by_owner() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com").await;
        let other = user(&store, "other@example.com").await;
        let board = Board::new(owner.id, "Jobs".into(), None);
        store.create_board(&board).await.unwrap();
        let app = Application::create(
            board.id,
            fields("Google", ApplicationStatus::Wishlist),
            OffsetDateTime::now_utc(),
        );
        store.create_application(&app).await.unwrap();

        assert!(store.find_application(app.id, owner.id).await.unwrap().is_some());
        assert!(store.find_application(app.id, other.id).await.unwrap().is_none());
        assert!(!store.delete_application(app.id, other.id).await.unwrap());
        assert!(store.find_board(board.id, other.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_board_cascades_to_applications() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com").await;
        let board = Board::new(owner.id, "Software Engineering Jobs".into(), None);
        store.create_board(&board).await.unwrap();

        let mut ids = Vec::new();
        for company in ["Google", "Microsoft", "Apple"] {
            let app = Application::create(
                board.id,
                fields(company, ApplicationStatus::Wishlist),
                OffsetDateTime::now_utc(),
            );
            store.create_application(&app).await.unwrap();
            ids.push(app.id);
        }

        assert!(store.delete_board(board.id, owner.id).await.unwrap());

        for id in ids {
            assert!(store.find_application(id, owner.id).await.unwrap().is_none());
        }
        assert_eq!(store.count_boards(owner.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn recent_boards_are_limited_and_newest_first() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com").await;
        let base = OffsetDateTime::now_utc();
        for i in 0..7 {
            let mut board = Board::new(owner.id, format!("Board {i}"), None);
            board.created_at = base + time::Duration::minutes(i);
            store.create_board(&board).await.unwrap();
        }

        let recent = store.list_boards(owner.id, Some(5)).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].name, "Board 6");
        assert_eq!(store.list_boards(owner.id, None).await.unwrap().len(), 7);
    }
}
