pub mod block;
pub mod gain;

pub use block::{BlockProcessor, DEFAULT_BLOCK_SIZE};
pub use gain::{db_to_linear, linear_to_db, process, process_into, GainProcessor};

use crate::core::SampleBuffer;
use crate::error::Result;

/// Stateless transform from one channel-major buffer into another of the same shape
pub trait BufferProcessor {
    fn process(&self, input: &SampleBuffer, output: &mut SampleBuffer) -> Result<()>;
}
