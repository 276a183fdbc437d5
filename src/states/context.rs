//! Context Store
//!
//! Holds the selected company, location, device, and date range. Every write
//! applies its downstream clears in the same call, so readers never see a device
//! from one location paired with a different location.
//!
//! The store performs no reference-data lookups. Narrowing against the catalog is
//! the resolver's job (see [`crate::states::resolver`]).

use crate::domain::{CompanyId, DateRange, DateRangeKey, DeviceId, LocationId};
use chrono::NaiveDate;

/// The current selection narrowing which data is queried and shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeContext {
    pub company_id: Option<CompanyId>,
    pub location_id: Option<LocationId>,
    pub device_id: Option<DeviceId>,
    pub date_range: DateRange,
}

/// Key identifying the scope a fetch was issued for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    pub company_id: Option<CompanyId>,
    pub location_id: Option<LocationId>,
    pub device_id: Option<DeviceId>,
    pub range_key: DateRangeKey,
}

impl ScopeContext {
    pub fn key(&self, today: NaiveDate) -> ScopeKey {
        ScopeKey {
            company_id: self.company_id.clone(),
            location_id: self.location_id.clone(),
            device_id: self.device_id.clone(),
            range_key: self.date_range.key_or_default(today),
        }
    }
}

/// Which fields a write touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextChange {
    pub company: bool,
    pub location: bool,
    pub device: bool,
    pub date_range: bool,
}

impl ContextChange {
    pub fn any(&self) -> bool {
        self.company || self.location || self.device || self.date_range
    }

    /// Company/location/device chain changed
    pub fn scope(&self) -> bool {
        self.company || self.location || self.device
    }

    pub fn merge(self, other: ContextChange) -> ContextChange {
        ContextChange {
            company: self.company || other.company,
            location: self.location || other.location,
            device: self.device || other.device,
            date_range: self.date_range || other.date_range,
        }
    }
}

/// Single source of truth for the scope selection
#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    scope: ScopeContext,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Getters ====================

    pub fn scope(&self) -> &ScopeContext {
        &self.scope
    }

    pub fn company_id(&self) -> Option<&CompanyId> {
        self.scope.company_id.as_ref()
    }

    pub fn location_id(&self) -> Option<&LocationId> {
        self.scope.location_id.as_ref()
    }

    pub fn device_id(&self) -> Option<&DeviceId> {
        self.scope.device_id.as_ref()
    }

    pub fn date_range(&self) -> DateRange {
        self.scope.date_range
    }

    // ==================== Setters ====================

    /// Set the company and unconditionally clear location and device
    pub fn set_company(&mut self, id: Option<CompanyId>) -> ContextChange {
        let change = ContextChange {
            company: self.scope.company_id != id,
            location: self.scope.location_id.is_some(),
            device: self.scope.device_id.is_some(),
            date_range: false,
        };
        self.scope.company_id = id;
        self.scope.location_id = None;
        self.scope.device_id = None;
        change
    }

    /// Set the location and unconditionally clear the device
    pub fn set_location(&mut self, id: Option<LocationId>) -> ContextChange {
        let change = ContextChange {
            location: self.scope.location_id != id,
            device: self.scope.device_id.is_some(),
            ..ContextChange::default()
        };
        self.scope.location_id = id;
        self.scope.device_id = None;
        change
    }

    pub fn set_device(&mut self, id: Option<DeviceId>) -> ContextChange {
        let change = ContextChange {
            device: self.scope.device_id != id,
            ..ContextChange::default()
        };
        self.scope.device_id = id;
        change
    }

    /// Replace the range wholesale
    pub fn set_date_range(&mut self, range: DateRange) -> ContextChange {
        let change = ContextChange {
            date_range: self.scope.date_range != range,
            ..ContextChange::default()
        };
        self.scope.date_range = range;
        change
    }

    /// Assert the trailing-week default when either end is unset
    pub fn ensure_default_date_range(&mut self, today: NaiveDate) -> ContextChange {
        if self.scope.date_range.is_complete() {
            return ContextChange::default();
        }
        self.set_date_range(DateRangeKey::Last7.range(today))
    }
}
