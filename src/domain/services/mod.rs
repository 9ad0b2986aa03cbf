pub mod access_control;
pub mod auth_service;
pub mod dashboard_service;
pub mod notification_service;
