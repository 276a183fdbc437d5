//! Page Filters
//!
//! Company and location filters on list pages. Until the user touches them they
//! follow the scope context; afterwards they are pinned and only narrowed. The
//! location filter falls back to "all" whenever it stops matching the company
//! filter or the location disappears.

use crate::domain::{CompanyId, Location, LocationId};
use crate::states::{ReferenceStore, ScopeContext};

/// `None` on either axis means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFilters {
    company: Option<CompanyId>,
    location: Option<LocationId>,
    pinned: bool,
}

impl PageFilters {
    /// Filters seeded from the current scope
    pub fn seeded(scope: &ScopeContext, refs: &ReferenceStore) -> Self {
        let mut filters = Self::default();
        filters.follow(scope, refs);
        filters
    }

    pub fn company(&self) -> Option<&CompanyId> {
        self.company.as_ref()
    }

    pub fn location(&self) -> Option<&LocationId> {
        self.location.as_ref()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Re-seed from scope unless the user has pinned the filters
    pub fn follow(&mut self, scope: &ScopeContext, refs: &ReferenceStore) {
        if self.pinned {
            self.normalize(refs);
            return;
        }
        self.location = scope.location_id.clone();
        self.company = match &scope.location_id {
            Some(location) => refs
                .company_id_of_location(location)
                .cloned()
                .or_else(|| scope.company_id.clone()),
            None => scope.company_id.clone(),
        };
        self.normalize(refs);
    }

    pub fn set_company(&mut self, company: Option<CompanyId>, refs: &ReferenceStore) {
        self.company = company;
        self.pinned = true;
        self.normalize(refs);
    }

    pub fn set_location(&mut self, location: Option<LocationId>, refs: &ReferenceStore) {
        self.location = location;
        self.pinned = true;
        self.normalize(refs);
    }

    /// Hand control back to the scope context
    pub fn unpin(&mut self, scope: &ScopeContext, refs: &ReferenceStore) {
        self.pinned = false;
        self.follow(scope, refs);
    }

    fn normalize(&mut self, refs: &ReferenceStore) {
        let Some(location_id) = &self.location else {
            return;
        };
        let valid = match (refs.location(location_id), &self.company) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(location), Some(company)) => &location.company_id == company,
        };
        if !valid {
            self.location = None;
        }
    }

    /// Options for the location picker under the current company filter
    pub fn location_options<'a>(&self, refs: &'a ReferenceStore) -> Vec<&'a Location> {
        refs.locations()
            .iter()
            .filter(|l| self.company.as_ref().is_none_or(|c| &l.company_id == c))
            .collect()
    }

    pub fn matches(&self, company: &CompanyId, location: &LocationId) -> bool {
        self.company.as_ref().is_none_or(|c| c == company)
            && self.location.as_ref().is_none_or(|l| l == location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::reference::fixtures::two_company_store;

    fn scope(company: Option<&str>, location: Option<&str>) -> ScopeContext {
        ScopeContext {
            company_id: company.map(CompanyId::from),
            location_id: location.map(LocationId::from),
            ..ScopeContext::default()
        }
    }

    #[test]
    fn test_seeded_from_location_derives_company() {
        let refs = two_company_store();
        let filters = PageFilters::seeded(&scope(None, Some("loc-3")), &refs);
        assert_eq!(filters.company().map(|c| c.as_str()), Some("co-b"));
        assert_eq!(filters.location().map(|l| l.as_str()), Some("loc-3"));
    }

    #[test]
    fn test_company_change_resets_location() {
        let refs = two_company_store();
        let mut filters = PageFilters::seeded(&scope(Some("co-a"), Some("loc-1")), &refs);
        filters.set_company(Some("co-b".into()), &refs);
        assert_eq!(filters.location(), None);
        assert!(filters.is_pinned());
        let names: Vec<&str> = filters
            .location_options(&refs)
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, ["Uptown"]);
    }

    #[test]
    fn test_pinned_filters_ignore_scope() {
        let refs = two_company_store();
        let mut filters = PageFilters::seeded(&scope(Some("co-a"), None), &refs);
        filters.set_location(Some("loc-2".into()), &refs);
        filters.follow(&scope(Some("co-b"), None), &refs);
        assert_eq!(filters.company().map(|c| c.as_str()), Some("co-a"));
        filters.unpin(&scope(Some("co-b"), None), &refs);
        assert_eq!(filters.company().map(|c| c.as_str()), Some("co-b"));
        assert_eq!(filters.location(), None);
    }

    #[test]
    fn test_matches() {
        let refs = two_company_store();
        let filters = PageFilters::seeded(&scope(Some("co-a"), None), &refs);
        assert!(filters.matches(&"co-a".into(), &"loc-2".into()));
        assert!(!filters.matches(&"co-b".into(), &"loc-3".into()));
        assert!(PageFilters::default().matches(&"co-b".into(), &"loc-3".into()));
    }
}
