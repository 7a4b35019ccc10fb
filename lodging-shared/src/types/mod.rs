pub mod api;
pub mod event;
pub mod role;

pub use api::*;
pub use event::*;
pub use role::*;
