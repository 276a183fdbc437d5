//! Cascading Selection Resolver
//!
//! Keeps the location and device selections consistent with the company and
//! location above them, against the live reference data:
//!
//! 1. valid locations = locations of the selected company, or all locations
//! 2. a selected location outside that set is cleared (which clears the device)
//! 3. valid devices = devices at the selected location, else devices under the
//!    valid locations when a company is selected, else all devices
//! 4. a selected device outside that set is cleared
//!
//! A location or device that no longer exists is handled exactly like one that
//! belongs to another parent: it is cleared, never reported as an error.
//!
//! The resolver only ever clears, and writes straight to the [`ContextStore`]
//! rather than going back through the workspace setters, so a clear can never
//! schedule another resolve. Running it on a consistent scope performs no writes.

use crate::states::context::{ContextChange, ContextStore};
use crate::states::reference::ReferenceStore;

/// Normalize `store` against `refs`; returns the fields that were cleared
pub fn resolve(store: &mut ContextStore, refs: &ReferenceStore) -> ContextChange {
    let mut change = ContextChange::default();

    if let Some(location_id) = store.location_id().cloned() {
        let valid = match (store.company_id(), refs.location(&location_id)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(company), Some(location)) => &location.company_id == company,
        };
        if !valid {
            tracing::debug!(location = %location_id, "Clearing location outside company scope");
            change = change.merge(store.set_location(None));
        }
    }

    if let Some(device_id) = store.device_id().cloned() {
        let valid = match refs.device(&device_id) {
            None => false,
            Some(device) => match (store.location_id(), store.company_id()) {
                (Some(location), _) => &device.location_id == location,
                (None, Some(company)) => {
                    refs.company_id_of_location(&device.location_id) == Some(company)
                }
                (None, None) => true,
            },
        };
        if !valid {
            tracing::debug!(device = %device_id, "Clearing device outside location scope");
            change = change.merge(store.set_device(None));
        }
    }

    change
}

/// Whether `store` already satisfies the cascade invariants
pub fn is_consistent(store: &ContextStore, refs: &ReferenceStore) -> bool {
    let mut probe = store.clone();
    !resolve(&mut probe, refs).any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompanyId, DeviceId, LocationId};
    use crate::states::reference::fixtures::{device, two_company_store};
    use proptest::prelude::*;

    fn scoped(company: Option<&str>, location: Option<&str>, device: Option<&str>) -> ContextStore {
        let mut store = ContextStore::new();
        store.set_company(company.map(CompanyId::from));
        store.set_location(location.map(LocationId::from));
        store.set_device(device.map(DeviceId::from));
        store
    }

    #[test]
    fn test_cross_company_location_cleared() {
        let refs = two_company_store();
        let mut store = scoped(Some("co-a"), Some("loc-3"), None);
        let change = resolve(&mut store, &refs);
        assert!(change.location);
        assert_eq!(store.location_id(), None);
        assert_eq!(store.company_id().map(|c| c.as_str()), Some("co-a"));
    }

    #[test]
    fn test_location_clear_cascades_to_device() {
        let refs = two_company_store();
        let mut store = scoped(Some("co-a"), Some("loc-3"), Some("dev-3a"));
        let change = resolve(&mut store, &refs);
        assert!(change.location && change.device);
        assert_eq!(store.device_id(), None);
    }

    #[test]
    fn test_device_from_other_location_cleared() {
        let refs = two_company_store();
        let mut store = scoped(Some("co-a"), Some("loc-1"), Some("dev-2a"));
        let change = resolve(&mut store, &refs);
        assert!(!change.location);
        assert!(change.device);
        assert_eq!(store.location_id().map(|l| l.as_str()), Some("loc-1"));
    }

    #[test]
    fn test_device_checked_against_company_without_location() {
        let refs = two_company_store();
        let mut ok = scoped(Some("co-a"), None, Some("dev-2b"));
        assert!(!resolve(&mut ok, &refs).any());
        let mut bad = scoped(Some("co-a"), None, Some("dev-3b"));
        assert!(resolve(&mut bad, &refs).device);
    }

    #[test]
    fn test_unscoped_selections_kept() {
        let refs = two_company_store();
        let mut store = scoped(None, Some("loc-3"), Some("dev-3a"));
        assert!(!resolve(&mut store, &refs).any());
        let mut store = scoped(None, None, Some("dev-1a"));
        assert!(!resolve(&mut store, &refs).any());
    }

    #[test]
    fn test_deleted_location_treated_as_mismatch() {
        let mut refs = two_company_store();
        let mut store = scoped(Some("co-a"), Some("loc-1"), Some("dev-1a"));
        assert!(is_consistent(&store, &refs));
        refs.remove_location(&"loc-1".into());
        let change = resolve(&mut store, &refs);
        assert!(change.location && change.device);
        assert_eq!(store.company_id().map(|c| c.as_str()), Some("co-a"));
    }

    #[test]
    fn test_deleted_device_cleared() {
        let mut refs = two_company_store();
        let mut store = scoped(None, None, Some("dev-1a"));
        refs.remove_device(&"dev-1a".into());
        assert!(resolve(&mut store, &refs).device);
    }

    #[test]
    fn test_moved_device_follows_reference_data() {
        let mut refs = two_company_store();
        refs.add_device(device("dev-new", "New", "loc-2"));
        let mut store = scoped(Some("co-a"), Some("loc-2"), Some("dev-new"));
        assert!(!resolve(&mut store, &refs).any());
    }

    fn maybe(ids: &'static [&'static str]) -> impl Strategy<Value = Option<&'static str>> {
        proptest::option::of(proptest::sample::select(ids))
    }

    proptest! {
        #[test]
        fn prop_resolve_is_idempotent(
            company in maybe(&["co-a", "co-b", "co-x"]),
            location in maybe(&["loc-1", "loc-2", "loc-3", "loc-x"]),
            device in maybe(&["dev-1a", "dev-2b", "dev-3a", "dev-x"]),
        ) {
            let refs = two_company_store();
            let mut store = scoped(company, location, device);
            resolve(&mut store, &refs);
            let first = store.scope().clone();
            let second = resolve(&mut store, &refs);
            prop_assert!(!second.any());
            prop_assert_eq!(store.scope(), &first);
            prop_assert!(is_consistent(&store, &refs));
        }

        #[test]
        fn prop_resolve_never_touches_company(
            company in maybe(&["co-a", "co-b", "co-x"]),
            location in maybe(&["loc-1", "loc-3"]),
        ) {
            let refs = two_company_store();
            let mut store = scoped(company, location, None);
            let change = resolve(&mut store, &refs);
            prop_assert!(!change.company);
            prop_assert_eq!(store.company_id().map(|c| c.as_str()), company);
        }
    }
}
