//! Dense ordering of rows within a scope.
//!
//! `engine` computes new orders, `kind` binds an entity kind to its table and
//! `service` runs the operations against the database.

pub mod engine;
pub mod kind;
pub mod service;

pub use engine::{CrossScopeMove, OrderUpdate, ScopeAssignment};
pub use kind::*;
pub use service::*;
