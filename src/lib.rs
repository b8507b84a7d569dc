//! Attendance Report Engine
//!
//! This crate computes workforce attendance/absence metrics over a reporting
//! period and drives them through a delivery pipeline: period resolution,
//! parallel aggregation on a bounded worker pool, rendering via injected
//! renderer collaborators, and email delivery under a bounded-retry envelope.

#![warn(missing_docs)]

pub mod aggregation;
pub mod config;
pub mod delivery;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod resolver;
