//! Result analysis engine for school examinations.
//!
//! Raw subject marks go in; graded, totalled, and ranked per-student records
//! come out. See [`workflows::results`] for the engine and
//! [`workflows::scoresheet`] for loading batches from disk.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
