use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GainError {
    /// Buffer length or shape does not match the declared channel/sample counts
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GainError>;

/// Expected flat length for a channel-major buffer, rejecting overflow.
pub(crate) fn expected_len(num_channels: usize, num_samples: usize) -> Result<usize> {
    num_channels.checked_mul(num_samples).ok_or_else(|| {
        GainError::InvalidArgument(format!(
            "{} channels x {} samples overflows usize",
            num_channels, num_samples
        ))
    })
}
