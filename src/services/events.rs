//! Service Events
//!
//! Fetch results emitted by the service layer and consumed by the workspace.
//! Every event carries the request id it answers so stale results can be dropped.

use crate::domain::{Alert, Catalog, DeviceStatus, Diagnostics, FirmwareRelease, Metrics};
use std::sync::Arc;

/// Data feeds the workspace loads
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Feed {
    Catalog,
    Overview,
    Fleet,
    Alerts,
    Diagnostics,
    Firmware,
}

impl Feed {
    pub fn name(&self) -> &'static str {
        match self {
            Feed::Catalog => "catalog",
            Feed::Overview => "overview",
            Feed::Fleet => "fleet",
            Feed::Alerts => "alerts",
            Feed::Diagnostics => "diagnostics",
            Feed::Firmware => "firmware",
        }
    }
}

impl std::fmt::Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one fetch; the error side is the display message
pub type FetchResult<T> = Result<T, Arc<str>>;

/// Events emitted by the service layer
#[derive(Clone, Debug)]
pub enum ServiceEvent {
    Catalog {
        request_id: u64,
        result: FetchResult<Catalog>,
    },
    Overview {
        request_id: u64,
        result: FetchResult<Option<Metrics>>,
    },
    Fleet {
        request_id: u64,
        result: FetchResult<Vec<DeviceStatus>>,
    },
    Alerts {
        request_id: u64,
        result: FetchResult<Vec<Alert>>,
    },
    Diagnostics {
        request_id: u64,
        result: FetchResult<Diagnostics>,
    },
    Firmware {
        request_id: u64,
        result: FetchResult<Vec<FirmwareRelease>>,
    },
}

impl ServiceEvent {
    pub fn feed(&self) -> Feed {
        match self {
            ServiceEvent::Catalog { .. } => Feed::Catalog,
            ServiceEvent::Overview { .. } => Feed::Overview,
            ServiceEvent::Fleet { .. } => Feed::Fleet,
            ServiceEvent::Alerts { .. } => Feed::Alerts,
            ServiceEvent::Diagnostics { .. } => Feed::Diagnostics,
            ServiceEvent::Firmware { .. } => Feed::Firmware,
        }
    }

    pub fn request_id(&self) -> u64 {
        match self {
            ServiceEvent::Catalog { request_id, .. }
            | ServiceEvent::Overview { request_id, .. }
            | ServiceEvent::Fleet { request_id, .. }
            | ServiceEvent::Alerts { request_id, .. }
            | ServiceEvent::Diagnostics { request_id, .. }
            | ServiceEvent::Firmware { request_id, .. } => *request_id,
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            ServiceEvent::Catalog { result, .. } => result.is_err(),
            ServiceEvent::Overview { result, .. } => result.is_err(),
            ServiceEvent::Fleet { result, .. } => result.is_err(),
            ServiceEvent::Alerts { result, .. } => result.is_err(),
            ServiceEvent::Diagnostics { result, .. } => result.is_err(),
            ServiceEvent::Firmware { result, .. } => result.is_err(),
        }
    }
}
