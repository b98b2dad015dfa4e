use super::BufferProcessor;
use crate::core::SampleBuffer;
use crate::error::{GainError, Result};

/// Samples per channel handed to a processor at a time
pub const DEFAULT_BLOCK_SIZE: usize = 2048;

/// Feeds a buffer through a processor in fixed-size blocks.
///
/// The final block is shorter when the sample count is not a multiple of the
/// block size; it is never padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockProcessor {
    block_size: usize,
}

impl Default for BlockProcessor {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl BlockProcessor {
    pub fn new(block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(GainError::InvalidArgument(
                "block size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { block_size })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn block_count(&self, num_samples: usize) -> usize {
        num_samples.div_ceil(self.block_size)
    }

    pub fn run<P: BufferProcessor + ?Sized>(
        &self,
        processor: &P,
        input: &SampleBuffer,
    ) -> Result<SampleBuffer> {
        let mut output = SampleBuffer::zeroed(input.num_channels(), input.num_samples())?;

        for index in 0..self.block_count(input.num_samples()) {
            let start = index * self.block_size;
            let block = input.block(start, self.block_size);
            let mut processed = SampleBuffer::zeroed(block.num_channels(), block.num_samples())?;

            processor.process(&block, &mut processed)?;
            output.copy_block_from(start, &processed)?;
        }

        Ok(output)
    }
}
