pub mod core;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod nodes;
pub mod observability;

pub use error::GainError;
