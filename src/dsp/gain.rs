use super::BufferProcessor;
use crate::core::SampleBuffer;
use crate::error::{expected_len, GainError, Result};

/// Convert a decibel gain to a linear factor: `10^(db/20)`
pub fn db_to_linear(db: f64) -> f64 {
    10_f64.powf(db / 20.0)
}

/// Convert a linear factor to decibels. Non-positive gains map to -inf.
pub fn linear_to_db(gain: f64) -> f64 {
    if gain <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * gain.log10()
    }
}

/// Scale every sample of a channel-major buffer by `10^(gain_db/20)`.
///
/// `input` must hold exactly `num_channels * num_samples` samples. The layout
/// does not matter to the result, so the whole buffer is scaled in one pass.
pub fn process(
    input: &[f64],
    num_channels: usize,
    num_samples: usize,
    gain_db: f64,
) -> Result<Vec<f64>> {
    check_len("input", input.len(), num_channels, num_samples)?;

    let gain = db_to_linear(gain_db);
    Ok(input.iter().map(|sample| sample * gain).collect())
}

/// Same as [`process`], overwriting a caller-owned output buffer.
///
/// Both slices are checked before anything is written.
pub fn process_into(
    input: &[f64],
    output: &mut [f64],
    num_channels: usize,
    num_samples: usize,
    gain_db: f64,
) -> Result<()> {
    check_len("input", input.len(), num_channels, num_samples)?;
    check_len("output", output.len(), num_channels, num_samples)?;

    GainProcessor::new(gain_db).scale_into(input, output);
    Ok(())
}

fn check_len(name: &str, actual: usize, num_channels: usize, num_samples: usize) -> Result<()> {
    let expected = expected_len(num_channels, num_samples)?;
    if actual != expected {
        return Err(GainError::InvalidArgument(format!(
            "{} has {} samples, expected {} ({} channels x {} samples)",
            name, actual, expected, num_channels, num_samples
        )));
    }
    Ok(())
}

/// Fixed gain with the linear factor computed once
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainProcessor {
    gain_db: f64,
    gain_linear: f64,
}

impl Default for GainProcessor {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl GainProcessor {
    pub fn new(gain_db: f64) -> Self {
        Self {
            gain_db,
            gain_linear: db_to_linear(gain_db),
        }
    }

    pub fn gain_db(&self) -> f64 {
        self.gain_db
    }

    pub fn gain_linear(&self) -> f64 {
        self.gain_linear
    }

    /// Scale samples in place
    pub fn apply(&self, samples: &mut [f64]) {
        for sample in samples.iter_mut() {
            *sample *= self.gain_linear;
        }
    }

    fn scale_into(&self, input: &[f64], output: &mut [f64]) {
        for (out_sample, in_sample) in output.iter_mut().zip(input) {
            *out_sample = in_sample * self.gain_linear;
        }
    }
}

impl BufferProcessor for GainProcessor {
    fn process(&self, input: &SampleBuffer, output: &mut SampleBuffer) -> Result<()> {
        if !input.same_shape(output) {
            return Err(GainError::InvalidArgument(format!(
                "input is {}x{}, output is {}x{}",
                input.num_channels(),
                input.num_samples(),
                output.num_channels(),
                output.num_samples()
            )));
        }

        self.scale_into(input.as_slice(), output.as_mut_slice());
        Ok(())
    }
}
