pub mod arena_commands;
pub mod roster_commands;
