// Domain entities

pub mod battle;
pub mod model;
pub mod student;

pub use battle::*;
pub use model::*;
pub use student::*;
