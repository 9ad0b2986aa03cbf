pub mod auth;
pub mod dashboard;
pub mod message;
pub mod notification;
pub mod project;
pub mod project_member;
pub mod task;
pub mod user;
