pub mod clock;
pub mod dice_service;
pub mod health_service;

pub use clock::*;
pub use dice_service::*;
pub use health_service::*;
