//! Queued route planning over a shared grid.
//!
//! Each worker owns one `SearchEngine` (and so one buffer set) and drains its
//! own bounded queue on a blocking thread. Requests are spread round-robin.
//! Workers exit once every handle has been dropped.

use skypath_core::{
    BoundaryResolver, GridModel, Path, PathRequest, Position, SearchEngine, SearchError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::PlannerConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("planner is shut down")]
    Closed,
}

struct PlanJob {
    request: PathRequest,
    reply: oneshot::Sender<Result<Path, SearchError>>,
}

#[derive(Clone)]
pub struct PlannerHandle {
    queues: Arc<[mpsc::Sender<PlanJob>]>,
    next: Arc<AtomicUsize>,
    resolver: BoundaryResolver,
}

/// Start `config.workers` search workers over `grid`.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_planner(
    grid: Arc<GridModel>,
    config: &PlannerConfig,
) -> (PlannerHandle, Vec<JoinHandle<()>>) {
    let search_config = config.search_config();
    let workers = config.workers.max(1);
    let mut queues = Vec::with_capacity(workers);
    let mut handles = Vec::with_capacity(workers);

    for worker in 0..workers {
        let (tx, rx) = mpsc::channel(config.queue_depth.max(1));
        let engine = SearchEngine::with_config(Arc::clone(&grid), search_config.clone());
        queues.push(tx);
        handles.push(tokio::task::spawn_blocking(move || {
            run_worker(worker, engine, rx)
        }));
    }

    tracing::info!(
        workers,
        width = grid.width(),
        height = grid.height(),
        "route planner started"
    );

    let handle = PlannerHandle {
        queues: queues.into(),
        next: Arc::new(AtomicUsize::new(0)),
        resolver: grid.resolver().with_policy(search_config.boundary),
    };
    (handle, handles)
}

fn run_worker(worker: usize, mut engine: SearchEngine, mut jobs: mpsc::Receiver<PlanJob>) {
    while let Some(job) = jobs.blocking_recv() {
        let result = engine.execute(job.request);
        if let Err(err) = &result {
            if err.is_fatal() {
                tracing::error!(worker, error = %err, "search produced a corrupt parent chain");
            }
        }
        if job.reply.send(result).is_err() {
            tracing::debug!(worker, "requester went away before the reply");
        }
    }
    tracing::debug!(worker, searches = engine.searches(), "planner worker stopped");
}

impl PlannerHandle {
    pub fn workers(&self) -> usize {
        self.queues.len()
    }

    /// Resolver matching the planner's grid and boundary policy.
    pub fn resolver(&self) -> BoundaryResolver {
        self.resolver
    }

    pub async fn plan(&self, request: PathRequest) -> Result<Path, PlanError> {
        let slot = self.next.fetch_add(1, Ordering::Relaxed) % self.queues.len();
        let (reply, response) = oneshot::channel();
        self.queues[slot]
            .send(PlanJob { request, reply })
            .await
            .map_err(|_| PlanError::Closed)?;
        let result = response.await.map_err(|_| PlanError::Closed)?;
        Ok(result?)
    }

    /// Plan between two world positions, resolved through the planner's
    /// boundary policy.
    pub async fn plan_world(
        &self,
        from: Position,
        to: Position,
        fly_cost_multiplier: f32,
    ) -> Result<Path, PlanError> {
        let request = PathRequest::new(
            self.resolver.world_to_grid(from),
            self.resolver.world_to_grid(to),
            fly_cost_multiplier,
        );
        self.plan(request).await
    }
}
