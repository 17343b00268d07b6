//! Common types and utilities shared between the probes and the API.

pub mod config;
pub mod logging;
pub mod ports;
pub mod process;
pub mod types;
