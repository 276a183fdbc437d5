//! Service Hub
//!
//! Dispatches data source calls onto the tokio runtime and multiplexes their
//! results into a single channel for the workspace to drain.

use crate::domain::DeviceId;
use crate::error::Result;
use crate::services::events::{FetchResult, ServiceEvent};
use crate::services::runtime::spawn_named_in_tokio;
use crate::services::source::{AlertQuery, DataSource, FleetQuery, OverviewQuery};
use crossbeam_channel::{Receiver, Sender};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Central hub for the data source
pub struct ServiceHub<D: DataSource> {
    source: Arc<D>,
    next_request: Arc<AtomicU64>,
    /// Event sender (cloned into every spawned fetch)
    tx: Sender<ServiceEvent>,
    /// Event receiver (for the workspace)
    rx: Receiver<ServiceEvent>,
}

impl<D: DataSource> ServiceHub<D> {
    pub fn new(source: D) -> Self {
        Self::with_shared(Arc::new(source))
    }

    /// Share a source the caller keeps a handle to
    pub fn with_shared(source: Arc<D>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            source,
            next_request: Arc::new(AtomicU64::new(1)),
            tx,
            rx,
        }
    }

    pub fn source(&self) -> &Arc<D> {
        &self.source
    }

    /// Receiver carrying every fetch result
    pub fn events(&self) -> Receiver<ServiceEvent> {
        self.rx.clone()
    }

    fn next_request_id(&self) -> u64 {
        self.next_request.fetch_add(1, Ordering::SeqCst)
    }

    /// Spawn `fetch` and send its result wrapped by `wrap`; returns the request id
    fn dispatch<T, F, Fut>(
        &self,
        name: &'static str,
        fetch: F,
        wrap: fn(u64, FetchResult<T>) -> ServiceEvent,
    ) -> Result<u64>
    where
        T: Send + 'static,
        F: FnOnce(Arc<D>) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let request_id = self.next_request_id();
        let future = fetch(self.source.clone());
        let tx = self.tx.clone();
        spawn_named_in_tokio(name, async move {
            let result = future.await.map_err(|e| {
                tracing::warn!(request_id, error = %e, "{} fetch failed", name);
                Arc::<str>::from(e.to_string())
            });
            if tx.send(wrap(request_id, result)).is_err() {
                tracing::debug!(request_id, "Result receiver dropped");
            }
        })?;
        tracing::debug!(request_id, "Dispatched {} fetch", name);
        Ok(request_id)
    }

    // ==================== Fetch Operations ====================

    pub fn fetch_catalog(&self) -> Result<u64> {
        self.dispatch(
            "catalog",
            |source| async move { source.catalog().await },
            |request_id, result| ServiceEvent::Catalog { request_id, result },
        )
    }

    pub fn fetch_overview(&self, query: OverviewQuery) -> Result<u64> {
        self.dispatch(
            "overview",
            |source| async move { source.business_overview(query).await },
            |request_id, result| ServiceEvent::Overview { request_id, result },
        )
    }

    pub fn fetch_fleet(&self, query: FleetQuery) -> Result<u64> {
        self.dispatch(
            "fleet",
            |source| async move { source.fleet_status(query).await },
            |request_id, result| ServiceEvent::Fleet { request_id, result },
        )
    }

    pub fn fetch_alerts(&self, query: AlertQuery) -> Result<u64> {
        self.dispatch(
            "alerts",
            |source| async move { source.alerts(query).await },
            |request_id, result| ServiceEvent::Alerts { request_id, result },
        )
    }

    pub fn fetch_diagnostics(&self, device_id: Option<DeviceId>) -> Result<u64> {
        self.dispatch(
            "diagnostics",
            |source| async move { source.device_diagnostics(device_id).await },
            |request_id, result| ServiceEvent::Diagnostics { request_id, result },
        )
    }

    pub fn fetch_firmware(&self) -> Result<u64> {
        self.dispatch(
            "firmware",
            |source| async move { source.firmware_releases().await },
            |request_id, result| ServiceEvent::Firmware { request_id, result },
        )
    }

    /// Emit a service event directly (mainly for testing)
    #[cfg(test)]
    pub fn emit(&self, event: ServiceEvent) {
        let _ = self.tx.send(event);
    }
}

impl<D: DataSource> Clone for ServiceHub<D> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            next_request: self.next_request.clone(),
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<D: DataSource> std::fmt::Debug for ServiceHub<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHub")
            .field("next_request", &self.next_request.load(Ordering::SeqCst))
            .field("queued", &self.rx.len())
            .finish()
    }
}
