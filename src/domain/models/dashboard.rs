use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Clone, Default)]
pub struct MyTaskCounts {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct RecentActivity {
    pub tasks_created: i64,
    pub messages_sent: i64,
}

#[derive(Debug, Serialize, Clone)]
pub struct UpcomingTask {
    pub id: String,
    pub title: String,
    pub project_id: String,
    pub due_date: DateTime<Utc>,
    pub priority: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct DashboardStats {
    pub total_projects: i64,
    pub total_tasks: i64,
    pub my_tasks: MyTaskCounts,
    pub tasks_by_status: BTreeMap<String, i64>,
    pub recent_activity: RecentActivity,
    pub unread_notifications: i64,
}

#[derive(Debug, Serialize, Clone)]
pub struct DashboardOverview {
    pub statistics: DashboardStats,
    pub upcoming_deadlines: Vec<UpcomingTask>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub task_stats: BTreeMap<String, i64>,
    pub member_count: i64,
    pub is_owner: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TimelineEntry {
    pub date: NaiveDate,
    pub tasks_created: i64,
}

/// Raw GROUP BY rows fetched by the dashboard repository.
#[derive(Debug, FromRow, Clone)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, FromRow, Clone)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: i64,
}
