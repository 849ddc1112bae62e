//! Library side of the `rtm2todoist` converter: configuration, logging
//! and the staged conversion pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
