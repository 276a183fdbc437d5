//! Application Constants
//!
//! Centralized constants shared by the state, service, and feature layers.

/// Preference file name inside the platform config directory
pub const PREFERENCES_FILE: &str = "fleet-console.toml";

/// Project directory qualifiers (`directories::ProjectDirs::from`)
pub const PROJECT_QUALIFIER: &str = "com";
pub const PROJECT_ORGANIZATION: &str = "cyenx";
pub const PROJECT_APPLICATION: &str = "fleet-console";

/// Log file prefix for the rolling appender
pub const LOG_FILE_PREFIX: &str = "fleet-console.log";

/// Length of the default trailing date range asserted at startup
pub const DEFAULT_RANGE_DAYS: u64 = 7;

/// Simulated data source latency window
pub const FETCH_LATENCY_MIN_MS: u64 = 200;
pub const FETCH_LATENCY_MAX_MS: u64 = 400;

/// Default data table page size
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Service event batch drained per pump
pub const PUMP_BATCH_SIZE: usize = 256;

/// UI events buffered per subscriber before newer ones are dropped
pub const UI_EVENT_CAPACITY: usize = 1024;
