//! Output writers.
//!
//! - [`rss`]: the RSS 2.0 feed document (always written)
//! - [`json`]: the run summary (only when a path is configured)
//!
//! ```text
//! docs/
//! └── schools.xml
//! ```

pub mod json;
pub mod rss;
