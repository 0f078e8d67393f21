//! Glue between the command line and the pipeline stages.

pub(crate) mod commands;
pub(crate) mod progress;
