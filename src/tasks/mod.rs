//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: drops cache entries whose TTL has elapsed

mod sweeper;

pub use sweeper::spawn_sweeper_task;
