// Core data models for Funnelboard
// These structs represent the domain entities

pub mod principal;
pub mod user;
pub mod column;
pub mod task;
pub mod funnel;
pub mod lead;

pub use principal::*;
pub use user::*;
pub use column::*;
pub use task::*;
pub use funnel::*;
pub use lead::*;
