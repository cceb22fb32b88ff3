pub mod arena_handlers;
pub mod ops_handlers;
pub mod roster_handlers;

pub use arena_handlers::*;
pub use ops_handlers::*;
pub use roster_handlers::*;
