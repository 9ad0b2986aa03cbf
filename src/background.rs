use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::state::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Periodic due-soon sweep. Finds assigned, unfinished tasks due within the
/// next day and hands them to the dispatcher, which de-duplicates and absorbs
/// its own failures. Runs off the request path.
pub async fn start_due_soon_worker(state: Arc<AppState>) {
    info!("Starting due-soon notification worker...");

    loop {
        let now = Utc::now();
        let until = now + chrono::Duration::days(1);

        match state.task_repo.find_due_between(now, until).await {
            Ok(tasks) => {
                for task in tasks {
                    let span = info_span!("due_soon_check", task_id = %task.id, project_id = %task.project_id);
                    async {
                        state.dispatcher.task_due_soon(&task).await;
                    }
                    .instrument(span)
                    .await;
                }
            }
            Err(e) => error!("Failed to fetch due-soon tasks: {:?}", e),
        }

        sleep(SWEEP_INTERVAL).await;
    }
}
