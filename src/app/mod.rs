//! Application Layer
//!
//! Route table, guard, navigation tree, and the workspace that ties the stores
//! and services together.

pub mod guard;
pub mod navigation;
pub mod routes;
pub mod workspace;

pub use guard::{GuardDecision, fallback_route, guard, settle};
pub use navigation::{NavGroup, NavItem, VisibleGroup, nav_tree, visible_groups};
pub use routes::Route;
pub use workspace::Workspace;
