//! Domain Models
//!
//! Plain data types shared between the data source, the stores, and the views.

pub mod catalog;
pub mod diagnostics;
pub mod ids;
pub mod range;
pub mod status;

pub use catalog::*;
pub use diagnostics::*;
pub use ids::*;
pub use range::*;
pub use status::*;
