use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use shared::schedule::{TriggerSpec, next_fire_after};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tracing::{error, info};

pub(crate) type HandlerFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// The work run on each trigger firing. Implementations must never panic
/// the timer loop; failures are their own to log and absorb.
pub(crate) trait ReminderHandler: Send + Sync {
    fn run<'a>(&'a self) -> HandlerFuture<'a>;
}

/// Owns the recurring timer jobs. Each job is a spawned task that sleeps
/// until the next wall-clock firing and runs its handler outside the
/// shutdown select, so stopping lets in-flight handler executions finish.
pub(crate) struct ReminderScheduler {
    time_zone: Tz,
    jobs: HashMap<String, JoinHandle<()>>,
    shutdown: watch::Sender<bool>,
}

impl ReminderScheduler {
    pub(crate) fn new(time_zone: Tz) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            time_zone,
            jobs: HashMap::new(),
            shutdown,
        }
    }

    /// Registers the fixed daily medication-reminder jobs. Stable job ids
    /// make a second start replace the existing jobs instead of
    /// duplicating their firings.
    pub(crate) fn start(&mut self, times: &[TriggerSpec], handler: Arc<dyn ReminderHandler>) {
        for spec in times {
            let job_id = format!("medication_{}", spec.hhmm());
            self.register(&job_id, *spec, Arc::clone(&handler));
        }
        info!(
            jobs = self.jobs.len(),
            time_zone = %self.time_zone,
            "reminder schedules activated"
        );
    }

    pub(crate) fn register(
        &mut self,
        job_id: &str,
        spec: TriggerSpec,
        handler: Arc<dyn ReminderHandler>,
    ) {
        if let Some(previous) = self.jobs.remove(job_id) {
            previous.abort();
            info!(job_id, "replacing scheduled job");
        }

        let mut shutdown_rx = self.shutdown.subscribe();
        let time_zone = self.time_zone;
        let task_job_id = job_id.to_string();
        let task = tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let Some(next_fire) = next_fire_after(now, time_zone, &spec) else {
                    error!(job_id = %task_job_id, "could not compute next firing; job stops");
                    return;
                };
                let wait = (next_fire - now).to_std().unwrap_or(Duration::ZERO);

                tokio::select! {
                    _ = sleep(wait) => {}
                    _ = shutdown_rx.changed() => return,
                }

                info!(
                    job_id = %task_job_id,
                    fired_at = %Utc::now().to_rfc3339(),
                    "reminder trigger fired"
                );
                handler.run().await;

                if *shutdown_rx.borrow() {
                    return;
                }
            }
        });
        self.jobs.insert(job_id.to_string(), task);
    }

    pub(crate) fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Cancels all pending future firings. Safe with zero registered jobs;
    /// handlers already running are left to complete.
    pub(crate) fn stop(&mut self) {
        let _ = self.shutdown.send(true);
        self.jobs.clear();
        info!("reminder scheduler stopped");
    }
}
