//! Content extraction heuristics for a single article page.
//!
//! - [`content`]: heading lookup and article body isolation
//! - [`date`]: publication timestamp parsing from the isolated text

pub mod content;
pub mod date;
