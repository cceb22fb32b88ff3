// Backend Application Layer

pub mod commands;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod queries;
pub mod roster;
pub mod state;

pub use error::AppError;
pub use metrics::Metrics;
pub use state::AppState;
