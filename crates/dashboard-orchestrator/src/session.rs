//! Per-viewer dashboard session.
//!
//! Tracks which ticker is on screen. Every navigation bumps a generation
//! counter; a load may only publish its outcome while its generation is
//! still current, so a slow load for an old ticker can never overwrite the
//! view of the ticker the user moved on to.

use dashboard_core::{normalize_ticker, DashboardError, DashboardResult};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use crate::aggregator::DashboardAggregator;

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Idle,
    Loading { ticker: String },
    Ready(DashboardResult),
    Failed { ticker: String, message: String },
}

impl DashboardView {
    pub fn ticker(&self) -> Option<&str> {
        match self {
            DashboardView::Idle => None,
            DashboardView::Loading { ticker } | DashboardView::Failed { ticker, .. } => {
                Some(ticker.as_str())
            }
            DashboardView::Ready(result) => Some(result.ticker.as_str()),
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, DashboardView::Ready(_) | DashboardView::Failed { .. })
    }
}

/// Identifies one navigation; only the latest ticket may publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    ticker: String,
}

impl LoadTicket {
    pub fn ticker(&self) -> &str {
        &self.ticker
    }
}

#[derive(Default)]
struct ActiveLoad {
    generation: u64,
    task: Option<AbortHandle>,
}

struct SessionInner {
    aggregator: DashboardAggregator,
    active: Mutex<ActiveLoad>,
    view: watch::Sender<DashboardView>,
}

#[derive(Clone)]
pub struct DashboardSession {
    inner: Arc<SessionInner>,
}

impl DashboardSession {
    pub fn new(aggregator: DashboardAggregator) -> Self {
        let (view, _) = watch::channel(DashboardView::Idle);
        Self {
            inner: Arc::new(SessionInner {
                aggregator,
                active: Mutex::new(ActiveLoad::default()),
                view,
            }),
        }
    }

    /// Current view snapshot
    pub fn view(&self) -> DashboardView {
        self.inner.view.borrow().clone()
    }

    /// Receive every view change from now on.
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.inner.view.subscribe()
    }

    /// Start a navigation to `ticker`, invalidating whatever was loading.
    pub fn begin(&self, ticker: &str) -> Result<LoadTicket, DashboardError> {
        let ticker = normalize_ticker(ticker)?;
        let mut active = self.lock_active();
        active.generation += 1;
        if let Some(task) = active.task.take() {
            task.abort();
        }
        self.inner.view.send_replace(DashboardView::Loading {
            ticker: ticker.clone(),
        });

        Ok(LoadTicket {
            generation: active.generation,
            ticker,
        })
    }

    /// Publish the outcome of a load. Returns `false`, leaving the view
    /// untouched, when a newer navigation has happened since `ticket` was issued.
    pub fn complete(
        &self,
        ticket: &LoadTicket,
        outcome: Result<DashboardResult, DashboardError>,
    ) -> bool {
        let mut active = self.lock_active();
        if active.generation != ticket.generation {
            tracing::debug!("Discarding stale dashboard load for {}", ticket.ticker);
            return false;
        }
        active.task = None;

        let view = match outcome {
            Ok(result) => DashboardView::Ready(result),
            Err(e) => DashboardView::Failed {
                ticker: ticket.ticker.clone(),
                message: e.to_string(),
            },
        };
        self.inner.view.send_replace(view);
        true
    }

    /// Navigate to `ticker` and load it in the background.
    pub fn navigate(&self, ticker: &str) -> Result<JoinHandle<()>, DashboardError> {
        let ticket = self.begin(ticker)?;
        let session = self.clone();
        let handle = tokio::spawn({
            let ticket = ticket.clone();
            async move {
                let outcome = session.inner.aggregator.load(ticket.ticker()).await;
                session.complete(&ticket, outcome);
            }
        });

        let mut active = self.lock_active();
        if active.generation == ticket.generation {
            active.task = Some(handle.abort_handle());
        } else {
            handle.abort();
        }
        Ok(handle)
    }

    /// Navigate to `ticker` and wait for the outcome in the caller's task.
    ///
    /// Fails with [`DashboardError::Superseded`] when another navigation
    /// happened before the load finished; the view is then left untouched.
    pub async fn load(&self, ticker: &str) -> Result<DashboardResult, DashboardError> {
        let ticket = self.begin(ticker)?;
        let outcome = self.inner.aggregator.load(ticket.ticker()).await;
        if self.complete(&ticket, outcome.clone()) {
            outcome
        } else {
            Err(DashboardError::Superseded(ticket.ticker))
        }
    }

    /// The user left the dashboard; drop any in-flight load.
    pub fn leave(&self) {
        let mut active = self.lock_active();
        active.generation += 1;
        if let Some(task) = active.task.take() {
            task.abort();
        }
        self.inner.view.send_replace(DashboardView::Idle);
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, ActiveLoad> {
        self.inner
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}
