//! Library surface of the `survey-merge` CLI, split out so the summary and
//! command plumbing are testable.

#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
