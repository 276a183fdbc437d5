//! Service Layer
//!
//! Abstraction over the data source plus async dispatch. Results come back as
//! [`ServiceEvent`]s on one channel.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ServiceHub                              │
//! │  ┌──────────────────┐        ┌──────────────────────────┐   │
//! │  │ DataSource (Arc) │  ───▶  │ tokio runtime (spawned)  │   │
//! │  │  MockDataSource  │        │  fetch → ServiceEvent    │   │
//! │  └──────────────────┘        └──────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ ServiceEvent (request id, result)
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Workspace::pump()                           │
//! │              (Loadable per feed, stale drop)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod events;
mod hub;
pub mod mock;
mod runtime;
pub mod source;

pub use events::*;
pub use hub::*;
pub use mock::{Latency, MockData, MockDataSource};
pub use runtime::*;
pub use source::*;
