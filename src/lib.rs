//! Funnelboard - kanban task boards and sales funnels backed by SQLite
//!
//! This library provides the core functionality for Funnelboard, including:
//! - Database connection, configuration and migrations
//! - Data models for users, task columns, tasks, funnels, stages and leads
//! - A reordering engine keeping every list densely ordered (`0..N-1`)
//! - A generic collection service with ownership checks and transactional writes
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use funnelboard::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ordering;
pub mod repo;
pub mod validate;
