//! Commitplot - commit frequency charts for git repositories
//!
//! Reads commit history for one or more repositories, buckets it by a time
//! unit, optionally accumulates, normalises and shifts the series, and draws
//! them as a time-series chart with optional peak markers.

pub mod cli;
pub mod config;
pub mod git;
pub mod models;
pub mod peaks;
pub mod render;
pub mod transform;
