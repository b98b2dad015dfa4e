use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use crate::error::{GainError, Result};
use super::SampleBuffer;

/// Basic data unit passed between processing nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    /// Timestamp in microseconds since epoch
    pub timestamp: u64,

    /// Sequential frame number for ordering
    pub sequence_id: u64,

    /// Multi-channel data keyed by channel name
    pub payload: HashMap<String, Vec<f64>>,

    /// Side-channel information (gain_db, sample_rate, etc)
    pub metadata: HashMap<String, String>,
}

/// Payload key for planar channel `index`
pub fn channel_name(index: usize) -> String {
    format!("ch{}", index)
}

impl DataFrame {
    pub fn new(timestamp: u64, sequence_id: u64) -> Self {
        Self {
            timestamp,
            sequence_id,
            payload: HashMap::new(),
            metadata: HashMap::new(),
        }
    }

    /// Build a frame holding `buffer` as `ch0..chN-1`
    pub fn from_buffer(buffer: SampleBuffer, timestamp: u64, sequence_id: u64) -> Self {
        let mut frame = Self::new(timestamp, sequence_id);
        frame.set_buffer(buffer);
        frame
    }

    /// True when the payload is exactly `ch0..chN-1` for some N > 0
    pub fn is_planar(&self) -> bool {
        !self.payload.is_empty()
            && (0..self.payload.len()).all(|ch| self.payload.contains_key(&channel_name(ch)))
    }

    pub fn total_samples(&self) -> usize {
        self.payload.values().map(|data| data.len()).sum()
    }

    /// Gather `ch0..chN-1` into a channel-major buffer
    pub fn to_buffer(&self) -> Result<SampleBuffer> {
        if !self.is_planar() {
            return Err(GainError::InvalidArgument(format!(
                "frame #{} payload is not planar ch0..ch{}",
                self.sequence_id,
                self.payload.len().saturating_sub(1)
            )));
        }

        let channels = (0..self.payload.len())
            .map(|ch| self.payload[&channel_name(ch)].clone())
            .collect();
        SampleBuffer::from_channels(channels)
    }

    /// Replace the payload with the channels of `buffer`
    pub fn set_buffer(&mut self, buffer: SampleBuffer) {
        self.payload.clear();
        for (ch, data) in buffer.into_channels().into_iter().enumerate() {
            self.payload.insert(channel_name(ch), data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_round_trip_through_frame() {
        let buffer = SampleBuffer::from_channels(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let frame = DataFrame::from_buffer(buffer.clone(), 1000, 7);

        assert_eq!(frame.timestamp, 1000);
        assert_eq!(frame.sequence_id, 7);
        assert_eq!(frame.payload.get("ch1"), Some(&vec![3.0, 4.0]));
        assert!(frame.is_planar());
        assert_eq!(frame.total_samples(), 4);
        assert_eq!(frame.to_buffer().unwrap(), buffer);
    }

    #[test]
    fn test_non_planar_payload() {
        let mut frame = DataFrame::new(0, 0);
        assert!(!frame.is_planar());

        frame.payload.insert("main_channel".to_string(), vec![1.0]);
        assert!(!frame.is_planar());
        assert!(frame.to_buffer().is_err());

        let mut gap = DataFrame::new(0, 0);
        gap.payload.insert("ch0".to_string(), vec![1.0]);
        gap.payload.insert("ch2".to_string(), vec![1.0]);
        assert!(!gap.is_planar());
    }

    #[test]
    fn test_ragged_channels_rejected() {
        let mut frame = DataFrame::new(0, 0);
        frame.payload.insert("ch0".to_string(), vec![1.0, 2.0]);
        frame.payload.insert("ch1".to_string(), vec![1.0]);
        assert!(frame.to_buffer().is_err());
    }

    #[test]
    fn test_frame_serializes_to_json() {
        let mut frame = DataFrame::new(5, 1);
        frame.payload.insert("ch0".to_string(), vec![0.5]);
        frame.metadata.insert("gain_db".to_string(), "-12".to_string());

        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["payload"]["ch0"][0], 0.5);

        let back: DataFrame = serde_json::from_value(json).unwrap();
        assert_eq!(back, frame);
    }
}
