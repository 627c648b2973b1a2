pub mod app;
pub mod applications;
pub mod auth;
pub mod boards;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod forms;
pub mod kanban;
pub mod pipeline;
pub mod state;
pub mod templates;
