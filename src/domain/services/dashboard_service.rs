use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use chrono::{Duration, NaiveDate, Utc};

use crate::domain::models::dashboard::{
    DashboardOverview, DashboardStats, DayCount, MyTaskCounts, ProjectSummary, RecentActivity,
    StatusCount, TimelineEntry, UpcomingTask,
};
use crate::domain::models::task::TASK_STATUSES;
use crate::domain::ports::{DashboardRepository, NotificationRepository, ProjectRepository};
use crate::error::AppError;

const RECENT_WINDOW_DAYS: i64 = 7;
const UPCOMING_DEADLINE_LIMIT: i64 = 5;

/// Read-only aggregation over the entity store. Counting stays in SQL; this
/// service only assembles the pieces and fills in the gaps (missing statuses,
/// empty calendar days).
pub struct DashboardService {
    projects: Arc<dyn ProjectRepository>,
    dashboard: Arc<dyn DashboardRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl DashboardService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        dashboard: Arc<dyn DashboardRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self { projects, dashboard, notifications }
    }

    pub async fn stats(&self, user_id: &str) -> Result<DashboardOverview, AppError> {
        let project_ids = self.projects.accessible_project_ids(user_id).await?;
        let now = Utc::now();
        let week_ago = now - Duration::days(RECENT_WINDOW_DAYS);

        let (total_tasks, status_counts, tasks_created, messages_sent) = if project_ids.is_empty() {
            (0, Vec::new(), 0, 0)
        } else {
            (
                self.dashboard.count_tasks_in_projects(&project_ids).await?,
                self.dashboard.status_counts_in_projects(&project_ids).await?,
                self.dashboard.count_tasks_created_since(&project_ids, week_ago).await?,
                self.dashboard.count_messages_created_since(&project_ids, week_ago).await?,
            )
        };

        let (total, pending, completed) = self.dashboard.my_task_counts(user_id).await?;
        let unread_notifications = self.notifications.unread_count(user_id).await?;

        let upcoming_deadlines = self
            .dashboard
            .upcoming_tasks(user_id, now, now + Duration::days(RECENT_WINDOW_DAYS), UPCOMING_DEADLINE_LIMIT)
            .await?
            .into_iter()
            .filter_map(|t| {
                t.due_date.map(|due_date| UpcomingTask {
                    id: t.id,
                    title: t.title,
                    project_id: t.project_id,
                    due_date,
                    priority: t.priority,
                })
            })
            .collect();

        Ok(DashboardOverview {
            statistics: DashboardStats {
                total_projects: project_ids.len() as i64,
                total_tasks,
                my_tasks: MyTaskCounts { total, pending, completed },
                tasks_by_status: zero_filled_status_counts(&status_counts),
                recent_activity: RecentActivity { tasks_created, messages_sent },
                unread_notifications,
            },
            upcoming_deadlines,
        })
    }

    pub async fn recent_projects(&self, user_id: &str, limit: i64) -> Result<Vec<ProjectSummary>, AppError> {
        let projects = self.dashboard.recent_projects(user_id, limit).await?;

        let mut summaries = Vec::with_capacity(projects.len());
        for project in projects {
            let status_counts = self.dashboard.status_counts_for_project(&project.id).await?;
            let member_count = self.dashboard.member_count(&project.id).await?;

            summaries.push(ProjectSummary {
                is_owner: project.owner_id == user_id,
                id: project.id,
                name: project.name,
                description: project.description,
                created_at: project.created_at,
                task_stats: zero_filled_status_counts(&status_counts),
                // stored members plus the implicit owner
                member_count: member_count + 1,
            });
        }

        Ok(summaries)
    }

    /// One entry per calendar day for the trailing `days` window, today
    /// included. Dense: days without tasks appear with a zero count.
    pub async fn activity_timeline(&self, user_id: &str, days: i64) -> Result<Vec<TimelineEntry>, AppError> {
        let project_ids = self.projects.accessible_project_ids(user_id).await?;

        let now = Utc::now();
        let start_date = now.date_naive() - Duration::days(days - 1);

        let counts = if project_ids.is_empty() {
            Vec::new()
        } else {
            let start = start_date
                .and_hms_opt(0, 0, 0)
                .ok_or(AppError::Internal)?
                .and_utc();
            self.dashboard.daily_task_counts(&project_ids, start, now).await?
        };

        Ok(dense_timeline(start_date, days, &counts))
    }
}

fn zero_filled_status_counts(counts: &[StatusCount]) -> BTreeMap<String, i64> {
    let mut by_status: BTreeMap<String, i64> =
        TASK_STATUSES.iter().map(|s| (s.to_string(), 0)).collect();
    for row in counts {
        by_status.insert(row.status.clone(), row.count);
    }
    by_status
}

fn dense_timeline(start: NaiveDate, days: i64, counts: &[DayCount]) -> Vec<TimelineEntry> {
    let by_date: HashMap<NaiveDate, i64> = counts.iter().map(|c| (c.date, c.count)).collect();

    (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset);
            TimelineEntry {
                date,
                tasks_created: by_date.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn status_counts_default_missing_statuses_to_zero() {
        let counts = vec![StatusCount { status: "todo".into(), count: 3 }];
        let map = zero_filled_status_counts(&counts);

        assert_eq!(map["todo"], 3);
        assert_eq!(map["in_progress"], 0);
        assert_eq!(map["done"], 0);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn status_counts_empty_input_is_all_zero() {
        let map = zero_filled_status_counts(&[]);
        assert!(map.values().all(|&c| c == 0));
        assert_eq!(map.len(), TASK_STATUSES.len());
    }

    #[test]
    fn timeline_is_dense_and_contiguous() {
        let start = day(2024, 3, 1);
        let counts = vec![
            DayCount { date: day(2024, 3, 1), count: 2 },
            DayCount { date: day(2024, 3, 5), count: 1 },
        ];

        let timeline = dense_timeline(start, 7, &counts);

        assert_eq!(timeline.len(), 7);
        assert_eq!(timeline[0], TimelineEntry { date: day(2024, 3, 1), tasks_created: 2 });
        assert_eq!(timeline[1].tasks_created, 0);
        assert_eq!(timeline[4], TimelineEntry { date: day(2024, 3, 5), tasks_created: 1 });
        assert_eq!(timeline[6], TimelineEntry { date: day(2024, 3, 7), tasks_created: 0 });
    }

    #[test]
    fn timeline_spans_month_boundaries() {
        let start = day(2024, 1, 30);
        let timeline = dense_timeline(start, 4, &[]);

        let dates: Vec<NaiveDate> = timeline.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(2024, 1, 30), day(2024, 1, 31), day(2024, 2, 1), day(2024, 2, 2)]);
    }
}
