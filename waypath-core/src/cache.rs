//! Process-wide road graph snapshot with a readiness signal.
//!
//! Readers grab an `Arc` of the current snapshot without locking. Loading and
//! reloading build a complete new graph first and swap it in atomically, so
//! a reader never sees a half-built graph and keeps its old snapshot alive
//! for as long as it needs it.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use log::info;
use parking_lot::{Condvar, Mutex};

use crate::{Error, GraphSource, RoadGraph, create_road_graph};

#[derive(Debug, Default)]
pub struct GraphCache {
    current: ArcSwapOption<RoadGraph>,
    ready: Mutex<bool>,
    ready_signal: Condvar,
    /// Serialises loads so concurrent callers build the graph once
    loading: Mutex<()>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.lock()
    }

    /// Current snapshot.
    ///
    /// # Errors
    ///
    /// [`Error::GraphNotLoaded`] before the first publish.
    pub fn snapshot(&self) -> Result<Arc<RoadGraph>, Error> {
        self.current.load_full().ok_or(Error::GraphNotLoaded)
    }

    /// Install `graph` as the current snapshot and wake every waiter
    pub fn publish(&self, graph: RoadGraph) -> Arc<RoadGraph> {
        let graph = Arc::new(graph);
        self.current.store(Some(Arc::clone(&graph)));

        let mut ready = self.ready.lock();
        *ready = true;
        self.ready_signal.notify_all();
        graph
    }

    /// Block until a snapshot is published.
    ///
    /// # Errors
    ///
    /// [`Error::GraphNotLoaded`] when `timeout` elapses first.
    pub fn wait_ready(&self, timeout: Option<Duration>) -> Result<Arc<RoadGraph>, Error> {
        let mut ready = self.ready.lock();
        match timeout {
            Some(timeout) => {
                let _ = self
                    .ready_signal
                    .wait_while_for(&mut ready, |ready| !*ready, timeout);
            }
            None => {
                self.ready_signal.wait_while(&mut ready, |ready| !*ready);
            }
        }
        drop(ready);
        self.snapshot()
    }

    /// Return the current snapshot, loading it from `source` on first use.
    ///
    /// Concurrent callers wait for the single load in progress instead of
    /// loading again.
    pub fn get_or_load<S>(&self, source: &S) -> Result<Arc<RoadGraph>, Error>
    where
        S: GraphSource + ?Sized,
    {
        if let Ok(graph) = self.snapshot() {
            return Ok(graph);
        }
        let _guard = self.loading.lock();
        if let Ok(graph) = self.snapshot() {
            return Ok(graph);
        }
        let graph = create_road_graph(source)?;
        Ok(self.publish(graph))
    }

    /// Build a fresh snapshot from `source` and swap it in.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn reload<S>(&self, source: &S) -> Result<Arc<RoadGraph>, Error>
    where
        S: GraphSource + ?Sized,
    {
        let _guard = self.loading.lock();
        let graph = create_road_graph(source)?;
        info!("Swapping in reloaded road graph");
        Ok(self.publish(graph))
    }
}
