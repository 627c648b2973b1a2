use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::Store;
use crate::{
    applications::repo_types::{Application, ApplicationRow},
    auth::repo_types::{NewUser, User},
    boards::repo_types::Board,
};

const APPLICATION_COLUMNS: &str = r#"
    a.id, a.board_id, a.company, a.job_title, a.location, a.url, a.salary,
    a.description, a.status, a.created_at, a.applied_at, a.interviewed_at,
    a.offered_at, a.rejected_at
"#;

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

fn into_applications(rows: Vec<ApplicationRow>) -> anyhow::Result<Vec<Application>> {
    rows.into_iter()
        .map(|r| Application::try_from(r).map_err(anyhow::Error::from))
        .collect()
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, roles, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, roles, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash, roles, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.password_hash)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update_user_name(&self, id: Uuid, name: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.db)
            .await
            .context("update user name")?;
        Ok(())
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.db)
            .await
            .context("update password hash")?;
        Ok(())
    }

    async fn create_board(&self, board: &Board) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO job_boards (id, user_id, name, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(board.id)
        .bind(board.user_id)
        .bind(&board.name)
        .bind(&board.description)
        .bind(board.created_at)
        .execute(&self.db)
        .await
        .context("insert board")?;
        Ok(())
    }

    async fn find_board(&self, id: Uuid, owner: Uuid) -> anyhow::Result<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, user_id, name, description, created_at
            FROM job_boards
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(board)
    }

    async fn list_boards(&self, owner: Uuid, limit: Option<i64>) -> anyhow::Result<Vec<Board>> {
        // LIMIT NULL means no limit in PostgreSQL
        let rows = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, user_id, name, description, created_at
            FROM job_boards
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(owner)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn count_boards(&self, owner: Uuid) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM job_boards WHERE user_id = $1")
            .bind(owner)
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn update_board(&self, board: &Board) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE job_boards
               SET name = $3, description = $4
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(board.id)
        .bind(board.user_id)
        .bind(&board.name)
        .bind(&board.description)
        .execute(&self.db)
        .await
        .context("update board")?;
        Ok(())
    }

    async fn delete_board(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool> {
        // job_applications.board_id cascades
        let done = sqlx::query("DELETE FROM job_boards WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await
            .context("delete board")?;
        Ok(done.rows_affected() > 0)
    }

    async fn create_application(&self, a: &Application) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO job_applications
                (id, board_id, company, job_title, location, url, salary, description,
                 status, created_at, applied_at, interviewed_at, offered_at, rejected_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(a.id)
        .bind(a.board_id)
        .bind(&a.company)
        .bind(&a.job_title)
        .bind(&a.location)
        .bind(&a.url)
        .bind(&a.salary)
        .bind(&a.description)
        .bind(a.status.as_str())
        .bind(a.created_at)
        .bind(a.milestones.applied_at)
        .bind(a.milestones.interviewed_at)
        .bind(a.milestones.offered_at)
        .bind(a.milestones.rejected_at)
        .execute(&self.db)
        .await
        .context("insert application")?;
        Ok(())
    }

    async fn find_application(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> anyhow::Result<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            SELECT {APPLICATION_COLUMNS}
            FROM job_applications a
            JOIN job_boards b ON b.id = a.board_id
            WHERE a.id = $1 AND b.user_id = $2
            "#
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        row.map(Application::try_from).transpose().map_err(Into::into)
    }

    async fn list_applications_for_board(
        &self,
        board_id: Uuid,
    ) -> anyhow::Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            SELECT {APPLICATION_COLUMNS}
            FROM job_applications a
            WHERE a.board_id = $1
            ORDER BY a.created_at DESC
            "#
        ))
        .bind(board_id)
        .fetch_all(&self.db)
        .await?;
        into_applications(rows)
    }

    async fn list_applications_for_user(&self, owner: Uuid) -> anyhow::Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            SELECT {APPLICATION_COLUMNS}
            FROM job_applications a
            JOIN job_boards b ON b.id = a.board_id
            WHERE b.user_id = $1
            ORDER BY a.created_at DESC
            "#
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        into_applications(rows)
    }

    async fn save_application(&self, a: &Application) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE job_applications
               SET company = $2, job_title = $3, location = $4, url = $5, salary = $6,
                   description = $7, status = $8, applied_at = $9, interviewed_at = $10,
                   offered_at = $11, rejected_at = $12
             WHERE id = $1
            "#,
        )
        .bind(a.id)
        .bind(&a.company)
        .bind(&a.job_title)
        .bind(&a.location)
        .bind(&a.url)
        .bind(&a.salary)
        .bind(&a.description)
        .bind(a.status.as_str())
        .bind(a.milestones.applied_at)
        .bind(a.milestones.interviewed_at)
        .bind(a.milestones.offered_at)
        .bind(a.milestones.rejected_at)
        .execute(&self.db)
        .await
        .context("update application")?;
        Ok(())
    }

    async fn delete_application(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool> {
        let done = sqlx::query(
            r#"
            DELETE FROM job_applications a
             USING job_boards b
             WHERE b.id = a.board_id AND a.id = $1 AND b.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.db)
        .await
        .context("delete application")?;
        Ok(done.rows_affected() > 0)
    }
}
