//! Inline or deferred execution of projections with stale-result rejection.
//!
//! Each request takes a generation number when it is issued. A deferred
//! result is handed back only if no newer request was issued meanwhile.

use super::view::{compute_visible_rows, ComputeOptions, VisibleRow};
use crate::models::{Subnet, ViewState};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Rows produced for one request.
#[derive(Debug, Clone)]
pub struct Projection {
    pub generation: u64,
    /// True when the rows were computed on the blocking pool.
    pub deferred: bool,
    pub rows: Vec<VisibleRow>,
}

#[derive(Debug, Clone)]
pub struct ProjectionScheduler {
    generation: Arc<AtomicU64>,
    threshold: u64,
}

impl ProjectionScheduler {
    pub fn new(threshold: u64) -> Self {
        ProjectionScheduler {
            generation: Arc::new(AtomicU64::new(0)),
            threshold,
        }
    }

    /// Latest generation handed out.
    pub fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }

    fn issue(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Project `state` under `root`, deferring to the blocking pool when big.
    ///
    /// The generation is taken when this is called, not when the future is
    /// first polled. Resolves to `None` when the result went stale or the
    /// worker failed.
    pub fn project(
        &self,
        root: Subnet,
        state: ViewState,
        target_mask: u8,
    ) -> impl Future<Output = Option<Projection>> {
        let generation = self.issue();
        let scheduler = self.clone();
        async move {
            let defer = ComputeOptions {
                root: &root,
                state: &state,
                target_mask,
            }
            .should_defer(scheduler.threshold);

            if !defer {
                let rows = compute_visible_rows(&ComputeOptions {
                    root: &root,
                    state: &state,
                    target_mask,
                });
                if !scheduler.is_current(generation) {
                    log::debug!("Dropping stale inline projection #{generation}");
                    return None;
                }
                return Some(Projection {
                    generation,
                    deferred: false,
                    rows,
                });
            }

            log::info!(
                "Deferring projection #{generation} of {} down to /{target_mask}",
                root.cidr()
            );
            let joined = tokio::task::spawn_blocking(move || {
                compute_visible_rows(&ComputeOptions {
                    root: &root,
                    state: &state,
                    target_mask,
                })
            })
            .await;
            let rows = match joined {
                Ok(rows) => rows,
                Err(e) => {
                    log::error!("Projection #{generation} failed: {e}");
                    return None;
                }
            };
            if !scheduler.is_current(generation) {
                log::info!(
                    "Discarding stale projection #{generation}, current is #{}",
                    scheduler.current()
                );
                return None;
            }
            Some(Projection {
                generation,
                deferred: true,
                rows,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_cidr;

    #[tokio::test]
    async fn test_inline_projection() {
        let scheduler = ProjectionScheduler::new(4096);
        let root = parse_cidr("10.0.0.0/24").unwrap();
        let mut state = ViewState::new(26);
        state.expand("10.0.0.0/24");
        let projection = scheduler.project(root, state, 26).await.unwrap();
        assert!(!projection.deferred);
        assert_eq!(projection.generation, 1);
        assert_eq!(projection.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_deferred_projection() {
        let scheduler = ProjectionScheduler::new(0);
        let root = parse_cidr("10.0.0.0/24").unwrap();
        let state = ViewState::new(26);
        let projection = scheduler.project(root, state, 26).await.unwrap();
        assert!(projection.deferred);
        assert_eq!(projection.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_projection_is_discarded() {
        let scheduler = ProjectionScheduler::new(0);
        let root = parse_cidr("10.0.0.0/24").unwrap();
        let state = ViewState::new(26);
        let first = scheduler.project(root.clone(), state.clone(), 26);
        let second = scheduler.project(root, state, 26);
        assert!(first.await.is_none());
        let latest = second.await.unwrap();
        assert_eq!(latest.generation, 2);
        assert!(scheduler.is_current(2));
    }

    #[tokio::test]
    async fn test_stale_inline_projection_is_discarded() {
        let scheduler = ProjectionScheduler::new(4096);
        let root = parse_cidr("10.0.0.0/24").unwrap();
        let state = ViewState::new(26);
        let older = scheduler.project(root.clone(), state.clone(), 26);
        let newer = scheduler.project(root, state, 26);
        assert_eq!(scheduler.current(), 2);
        assert!(older.await.is_none());
        let latest = newer.await.unwrap();
        assert!(!latest.deferred);
        assert_eq!(latest.generation, 2);
    }
}
