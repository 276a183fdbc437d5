//! Authorization Layer
//!
//! Persona to capability mapping and the demo session that carries them.

pub mod capability;
pub mod session;

pub use capability::*;
pub use session::*;
