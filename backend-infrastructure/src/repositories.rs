pub mod clickhouse_battle_log;
pub mod json_roster;
pub mod memory_battle_log;

pub use clickhouse_battle_log::*;
pub use json_roster::*;
pub use memory_battle_log::*;
