//! Loadable - Per-View Async Load State
//!
//! Tracks idle/loading/succeeded/failed for one fetched resource, together with
//! the last good payload. Each dispatch gets a request id; only the response to
//! the most recent request is applied, so an older, slower response can never
//! overwrite data fetched for a newer scope.

use crate::states::context::ScopeKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loadable<T> {
    status: LoadStatus,
    data: T,
    error: Option<String>,
    pending: Option<u64>,
    scope: Option<ScopeKey>,
}

impl<T: Default> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            status: LoadStatus::Idle,
            data: T::default(),
            error: None,
            pending: None,
            scope: None,
        }
    }
}

impl<T> Loadable<T> {
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Scope the current data (or pending request) belongs to
    pub fn scope(&self) -> Option<&ScopeKey> {
        self.scope.as_ref()
    }

    /// Whether `request_id` is the request this view is waiting on
    pub fn is_pending(&self, request_id: u64) -> bool {
        self.pending == Some(request_id)
    }

    /// Mark a new request in flight. Earlier requests become stale.
    pub fn begin(&mut self, request_id: u64, scope: ScopeKey) {
        self.status = LoadStatus::Loading;
        self.error = None;
        self.pending = Some(request_id);
        self.scope = Some(scope);
    }

    /// Apply a response. Returns false (and changes nothing) for stale responses.
    pub fn complete(&mut self, request_id: u64, result: Result<T, String>) -> bool {
        if !self.is_pending(request_id) {
            return false;
        }
        self.pending = None;
        match result {
            Ok(data) => {
                self.status = LoadStatus::Succeeded;
                self.data = data;
            }
            Err(message) => {
                self.status = LoadStatus::Failed;
                self.error = Some(message);
            }
        }
        true
    }

    /// Local edit to the loaded payload (alert triage)
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateRangeKey;

    fn key(company: &str) -> ScopeKey {
        ScopeKey {
            company_id: Some(company.into()),
            location_id: None,
            device_id: None,
            range_key: DateRangeKey::Last7,
        }
    }

    #[test]
    fn test_success_flow() {
        let mut l: Loadable<Vec<u32>> = Loadable::default();
        assert_eq!(l.status(), LoadStatus::Idle);
        l.begin(1, key("a"));
        assert!(l.is_loading());
        assert!(l.complete(1, Ok(vec![1, 2])));
        assert_eq!(l.status(), LoadStatus::Succeeded);
        assert_eq!(l.data(), &vec![1, 2]);
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut l: Loadable<Vec<u32>> = Loadable::default();
        l.begin(1, key("a"));
        l.complete(1, Ok(vec![7]));
        l.begin(2, key("a"));
        assert!(l.complete(2, Err("boom".into())));
        assert_eq!(l.status(), LoadStatus::Failed);
        assert_eq!(l.error(), Some("boom"));
        assert_eq!(l.data(), &vec![7]);
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut l: Loadable<Vec<u32>> = Loadable::default();
        l.begin(1, key("a"));
        l.begin(2, key("b"));
        assert!(!l.complete(1, Ok(vec![1])));
        assert!(l.is_loading());
        assert!(l.complete(2, Ok(vec![2])));
        assert_eq!(l.data(), &vec![2]);
        assert_eq!(l.scope(), Some(&key("b")));
        assert!(!l.complete(2, Ok(vec![3])));
    }
}
