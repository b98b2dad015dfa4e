pub mod gain;

pub use gain::{GainConfig, GainNode};
