//! Navigation - Sidebar Tree and Capability Filter
//!
//! Static, ordered navigation tree. What a session sees is derived on every read
//! from its capability set; nothing here is cached.

use crate::app::routes::Route;
use crate::auth::{Capability, CapabilitySet};

/// One sidebar entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    /// Label shown when the sidebar is collapsed
    pub short_label: &'static str,
    pub route: Route,
    /// Icon name in the lucide set
    pub icon: &'static str,
    /// ANY-of; empty means no requirement
    pub required: &'static [Capability],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavGroup {
    pub label: &'static str,
    /// ANY-of; empty means always visible
    pub required: &'static [Capability],
    pub items: &'static [NavItem],
}

const fn item(
    label: &'static str,
    short_label: &'static str,
    route: Route,
    icon: &'static str,
) -> NavItem {
    NavItem {
        label,
        short_label,
        route,
        icon,
        required: &[],
    }
}

static BUSINESS_ITEMS: [NavItem; 6] = [
    item("Overview", "Ov", Route::BusinessOverview, "layout-dashboard"),
    item("Companies", "Co", Route::BusinessCompanies, "building-2"),
    item("Devices", "Dv", Route::BusinessDevices, "hard-drive"),
    item("Locations", "Lo", Route::BusinessLocations, "map-pin"),
    item("Staff", "St", Route::BusinessStaff, "users"),
    item("Reports", "Rp", Route::BusinessReports, "bar-chart-3"),
];

static OPERATIONS_ITEMS: [NavItem; 3] = [
    item("Fleet", "Fl", Route::OpsFleet, "activity"),
    item("Alerts", "Al", Route::OpsAlerts, "bell"),
    item("Locations", "Lo", Route::OpsLocations, "map-pin"),
];

static ENGINEERING_ITEMS: [NavItem; 2] = [
    item("Devices", "Dv", Route::EngDevices, "cpu"),
    item("Firmware", "Fw", Route::EngFirmware, "circuit-board"),
];

static ACCOUNT_ITEMS: [NavItem; 1] = [item("Profile", "Pr", Route::Profile, "user")];

static NAV_TREE: [NavGroup; 4] = [
    NavGroup {
        label: "Business",
        required: &[Capability::CanViewBusiness],
        items: &BUSINESS_ITEMS,
    },
    NavGroup {
        label: "Operations",
        required: &[Capability::CanViewOps],
        items: &OPERATIONS_ITEMS,
    },
    NavGroup {
        label: "Engineering",
        required: &[Capability::CanViewEng],
        items: &ENGINEERING_ITEMS,
    },
    NavGroup {
        label: "Account",
        required: &[],
        items: &ACCOUNT_ITEMS,
    },
];

/// The full navigation tree in display order
pub fn nav_tree() -> &'static [NavGroup] {
    &NAV_TREE
}

fn allowed(required: &[Capability], caps: CapabilitySet) -> bool {
    required.is_empty() || caps.intersects(required)
}

impl NavItem {
    /// Whether this entry should be highlighted for `current`
    pub fn is_active(&self, current: &Route) -> bool {
        let own = self.route.path();
        let path = current.path();
        path == own || path.starts_with(&format!("{own}/"))
    }
}

/// A group after filtering, borrowing from the static tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleGroup<'a> {
    pub label: &'static str,
    pub items: Vec<&'a NavItem>,
}

/// Stable filter: groups first, then items, dropping groups left empty
pub fn visible_groups(tree: &[NavGroup], caps: CapabilitySet) -> Vec<VisibleGroup<'_>> {
    tree.iter()
        .filter(|group| allowed(group.required, caps))
        .filter_map(|group| {
            let items: Vec<&NavItem> = group
                .items
                .iter()
                .filter(|item| allowed(item.required, caps))
                .collect();
            (!items.is_empty()).then_some(VisibleGroup {
                label: group.label,
                items,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Persona, capabilities_of};

    fn labels(groups: &[VisibleGroup<'_>]) -> Vec<&'static str> {
        groups.iter().map(|g| g.label).collect()
    }

    #[test]
    fn test_customer_admin_sees_business_ops_account() {
        let groups = visible_groups(nav_tree(), capabilities_of(Persona::CustomerAdmin));
        assert_eq!(labels(&groups), ["Business", "Operations", "Account"]);
        assert_eq!(groups[0].items.len(), 6);
    }

    #[test]
    fn test_internal_ops_matches_customer_admin() {
        assert_eq!(
            visible_groups(nav_tree(), capabilities_of(Persona::InternalOps)),
            visible_groups(nav_tree(), capabilities_of(Persona::CustomerAdmin))
        );
    }

    #[test]
    fn test_engineer_sees_everything_in_order() {
        let groups = visible_groups(nav_tree(), capabilities_of(Persona::Engineer));
        assert_eq!(labels(&groups), ["Business", "Operations", "Engineering", "Account"]);
        let eng: Vec<&str> = groups[2].items.iter().map(|i| i.label).collect();
        assert_eq!(eng, ["Devices", "Firmware"]);
    }

    #[test]
    fn test_empty_capabilities_keep_account() {
        let groups = visible_groups(nav_tree(), CapabilitySet::empty());
        assert_eq!(labels(&groups), ["Account"]);
    }

    #[test]
    fn test_gated_item_and_empty_group_dropped() {
        static GATED: [NavItem; 1] = [NavItem {
            label: "Logs",
            short_label: "Lg",
            route: Route::EngDevices,
            icon: "scroll",
            required: &[Capability::CanViewLogs],
        }];
        let tree = [NavGroup {
            label: "Open",
            required: &[],
            items: &GATED,
        }];
        assert!(visible_groups(&tree, capabilities_of(Persona::CustomerAdmin)).is_empty());
        assert_eq!(visible_groups(&tree, capabilities_of(Persona::Engineer)).len(), 1);
    }

    #[test]
    fn test_active_item_matches_detail_routes() {
        let devices = &nav_tree()[0].items[2];
        assert!(devices.is_active(&Route::BusinessDevices));
        assert!(devices.is_active(&Route::BusinessDevice("dev-1".into())));
        assert!(!devices.is_active(&Route::EngDevices));
    }
}
