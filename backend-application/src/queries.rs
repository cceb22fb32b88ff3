pub mod arena_queries;
pub mod roster_queries;
