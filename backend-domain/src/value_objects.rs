// Domain value objects
pub mod battle_side;
pub mod equipment_slot;
pub mod identifiers;

pub use battle_side::*;
pub use equipment_slot::*;
pub use identifiers::*;
