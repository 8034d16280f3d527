//! Background tasks module
//!
//! This module contains the task that owns the clock and runs alongside the HTTP server.

pub mod engine_task;

// Re-export main functions
pub use engine_task::{engine_task, spawn_engine};
