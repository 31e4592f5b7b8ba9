pub mod ordered;
pub mod user;
pub mod funnel;
pub mod column;
pub mod task;
pub mod funnel_column;
pub mod lead;

pub use ordered::*;
pub use user::*;
pub use funnel::*;
pub use column::*;
pub use task::*;
pub use funnel_column::*;
pub use lead::*;
