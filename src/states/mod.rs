//! State Management Layer
//!
//! Plain state objects owned by the [`crate::app::Workspace`]. Data flows one way:
//!
//! ```text
//! Action → Workspace method → ContextStore write → resolve → dispatch fetch
//!        → ServiceEvent → pump() → Loadable update → UiEvent → re-read
//! ```

pub mod context;
pub mod loadable;
pub mod preferences;
pub mod reference;
pub mod resolver;
pub mod ui;
mod ui_event;

pub use context::*;
pub use loadable::*;
pub use preferences::*;
pub use reference::ReferenceStore;
pub use resolver::{is_consistent, resolve};
pub use ui::*;
pub use ui_event::*;
