//! Fleet Console Library
//!
//! Headless core of a role-scoped fleet dashboard: personas and capabilities,
//! the scope context with its cascading resolver, navigation and route guarding,
//! and the async data layer feeding each page.

pub mod app;
pub mod auth;
pub mod components;
pub mod constants;
pub mod domain;
pub mod error;
pub mod features;
pub mod helpers;
pub mod services;
pub mod states;
pub mod utils;
