pub mod auth;
pub mod dashboard;
pub mod health;
pub mod member;
pub mod message;
pub mod notification;
pub mod project;
pub mod task;
