use super::generators::Generator;
use crate::message::SessionMessage;
use crate::registry::SessionRegistry;
use log::{debug, error, trace};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A bulk generator run: every `interval`, each step waits its delay and then
/// asks the session to apply its generator to the roster slice.
#[derive(Debug, Clone)]
pub struct Job {
    pub user: Arc<String>,
    pub steps: Vec<(Duration, Generator)>,
    pub interval: Duration,
    pub start: usize,
    pub count: Option<usize>,
}

#[derive(Debug, Default)]
struct Jobs {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

/// Repeating timers started through the control surface. They outlive the
/// sessions they target and only stop through [`Scheduler::stop_all`].
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    jobs: Arc<Mutex<Jobs>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    fn jobs(&self) -> MutexGuard<'_, Jobs> {
        self.jobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Spawns the job and returns how many jobs are running.
    pub fn start(&self, registry: SessionRegistry, job: Job) -> usize {
        let mut jobs = self.jobs();
        jobs.handles.retain(|handle| !handle.is_finished());

        let token = jobs.token.clone();
        jobs.handles.push(tokio::spawn(run(job, registry, token)));
        jobs.handles.len()
    }

    /// Cancels every job started so far and returns how many were running.
    pub fn stop_all(&self) -> usize {
        let mut jobs = self.jobs();
        jobs.token.cancel();
        jobs.token = CancellationToken::new();

        jobs.handles
            .drain(..)
            .filter(|handle| !handle.is_finished())
            .map(|handle| handle.abort())
            .count()
    }

    pub fn running(&self) -> usize {
        self.jobs()
            .handles
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

async fn run(job: Job, registry: SessionRegistry, token: CancellationToken) {
    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(job.interval) => {}
        }

        for (delay, generator) in &job.steps {
            if !delay.is_zero() {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(*delay) => {}
                }
            }

            if token.is_cancelled() {
                return;
            }

            let handle = match registry.lookup(&job.user) {
                Ok(Some(handle)) => handle,
                Ok(None) => {
                    trace!("{} is not connected, skipping {generator:?}", job.user);
                    continue;
                }
                Err(error) => {
                    error!("Stopping job for {}: {error}", job.user);
                    return;
                }
            };

            let step = SessionMessage::Bulk {
                generator: *generator,
                start: job.start,
                count: job.count,
                cancel: token.clone(),
            };

            if let Err(error) = handle.submit(step).await {
                debug!("Could not run {generator:?} for {}: {error}", job.user);
            }
        }
    }
}
