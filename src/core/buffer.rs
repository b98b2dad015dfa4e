use crate::error::{expected_len, GainError, Result};

/// Owned multi-channel samples in channel-major (planar) order.
///
/// Channel `c` occupies `data[c * num_samples..(c + 1) * num_samples]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    data: Vec<f64>,
    num_channels: usize,
    num_samples: usize,
}

impl SampleBuffer {
    pub fn new(data: Vec<f64>, num_channels: usize, num_samples: usize) -> Result<Self> {
        let expected = expected_len(num_channels, num_samples)?;
        if data.len() != expected {
            return Err(GainError::InvalidArgument(format!(
                "buffer has {} samples, expected {} ({} channels x {} samples)",
                data.len(),
                expected,
                num_channels,
                num_samples
            )));
        }

        Ok(Self {
            data,
            num_channels,
            num_samples,
        })
    }

    pub fn zeroed(num_channels: usize, num_samples: usize) -> Result<Self> {
        let len = expected_len(num_channels, num_samples)?;
        Ok(Self {
            data: vec![0.0; len],
            num_channels,
            num_samples,
        })
    }

    /// Flatten per-channel vectors into one contiguous buffer.
    pub fn from_channels(channels: Vec<Vec<f64>>) -> Result<Self> {
        let num_channels = channels.len();
        let num_samples = channels.first().map(|c| c.len()).unwrap_or(0);

        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != num_samples)
        {
            return Err(GainError::InvalidArgument(format!(
                "channel {} has {} samples, expected {}",
                index,
                channel.len(),
                num_samples
            )));
        }

        let mut data = Vec::with_capacity(expected_len(num_channels, num_samples)?);
        for channel in channels {
            data.extend(channel);
        }

        Ok(Self {
            data,
            num_channels,
            num_samples,
        })
    }

    /// De-interleave frame-major samples (`[L0, R0, L1, R1, ...]`).
    pub fn from_interleaved(interleaved: &[f64], num_channels: usize) -> Result<Self> {
        if num_channels == 0 {
            if interleaved.is_empty() {
                return Ok(Self {
                    data: Vec::new(),
                    num_channels: 0,
                    num_samples: 0,
                });
            }
            return Err(GainError::InvalidArgument(format!(
                "{} interleaved samples with zero channels",
                interleaved.len()
            )));
        }

        if interleaved.len() % num_channels != 0 {
            return Err(GainError::InvalidArgument(format!(
                "{} interleaved samples is not a multiple of {} channels",
                interleaved.len(),
                num_channels
            )));
        }

        let num_samples = interleaved.len() / num_channels;
        let mut data = vec![0.0; interleaved.len()];
        for (frame, samples) in interleaved.chunks_exact(num_channels).enumerate() {
            for (ch, &sample) in samples.iter().enumerate() {
                data[ch * num_samples + frame] = sample;
            }
        }

        Ok(Self {
            data,
            num_channels,
            num_samples,
        })
    }

    pub fn to_interleaved(&self) -> Vec<f64> {
        let mut interleaved = Vec::with_capacity(self.data.len());
        for frame in 0..self.num_samples {
            for ch in 0..self.num_channels {
                interleaved.push(self.data[ch * self.num_samples + frame]);
            }
        }
        interleaved
    }

    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.channels().map(|c| c.to_vec()).collect()
    }

    pub fn channels(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.num_channels).map(move |ch| self.channel_range(ch))
    }

    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        (index < self.num_channels).then(|| self.channel_range(index))
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [f64]> {
        if index >= self.num_channels {
            return None;
        }
        let start = index * self.num_samples;
        Some(&mut self.data[start..start + self.num_samples])
    }

    fn channel_range(&self, index: usize) -> &[f64] {
        let start = index * self.num_samples;
        &self.data[start..start + self.num_samples]
    }

    /// Copy samples `[start, start + len)` of every channel into a new buffer.
    /// The range is clamped to the end of the buffer.
    pub fn block(&self, start: usize, len: usize) -> SampleBuffer {
        let start = start.min(self.num_samples);
        let end = start.saturating_add(len).min(self.num_samples);
        let block_len = end - start;

        let mut data = Vec::with_capacity(self.num_channels * block_len);
        for channel in self.channels() {
            data.extend_from_slice(&channel[start..end]);
        }

        SampleBuffer {
            data,
            num_channels: self.num_channels,
            num_samples: block_len,
        }
    }

    /// Write `block` back into this buffer starting at sample offset `start`.
    pub fn copy_block_from(&mut self, start: usize, block: &SampleBuffer) -> Result<()> {
        if block.num_channels != self.num_channels {
            return Err(GainError::InvalidArgument(format!(
                "block has {} channels, buffer has {}",
                block.num_channels, self.num_channels
            )));
        }

        let end = start
            .checked_add(block.num_samples)
            .filter(|&end| end <= self.num_samples)
            .ok_or_else(|| {
                GainError::InvalidArgument(format!(
                    "block of {} samples at offset {} exceeds buffer of {} samples",
                    block.num_samples, start, self.num_samples
                ))
            })?;

        let num_samples = self.num_samples;
        for (ch, source) in block.channels().enumerate() {
            let offset = ch * num_samples;
            self.data[offset + start..offset + end].copy_from_slice(source);
        }

        Ok(())
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }

    pub(crate) fn same_shape(&self, other: &SampleBuffer) -> bool {
        self.num_channels == other.num_channels && self.num_samples == other.num_samples
    }
}
