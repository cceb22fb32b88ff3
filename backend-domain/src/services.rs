// Pure domain services: no I/O, no clocks, no global randomness

pub mod arbiter;
pub mod availability;

pub use arbiter::*;
pub use availability::*;
