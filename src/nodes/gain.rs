use std::sync::Arc;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::core::{DataFrame, ProcessingNode};
use crate::dsp::{BlockProcessor, GainProcessor, DEFAULT_BLOCK_SIZE};
use crate::error::GainError;
use crate::observability::NodeMetrics;

/// JSON config accepted by [`GainNode::on_create`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GainConfig {
    pub gain_db: f64,
    pub block_size: usize,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            gain_db: 0.0,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl GainConfig {
    pub fn validate(&self) -> Result<(), GainError> {
        if !self.gain_db.is_finite() {
            return Err(GainError::Config(format!("gain_db must be finite, got {}", self.gain_db)));
        }
        if self.block_size == 0 {
            return Err(GainError::Config("block_size must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Applies a fixed dB gain to every channel of each frame
pub struct GainNode {
    config: GainConfig,
    processor: GainProcessor,
    blocks: BlockProcessor,
    metrics: Arc<NodeMetrics>,
}

impl Default for GainNode {
    fn default() -> Self {
        Self::new()
    }
}

impl GainNode {
    pub fn new() -> Self {
        Self::with_id("gain")
    }

    pub fn with_id(node_id: impl Into<String>) -> Self {
        Self {
            config: GainConfig::default(),
            processor: GainProcessor::default(),
            blocks: BlockProcessor::default(),
            metrics: Arc::new(NodeMetrics::new(node_id)),
        }
    }

    pub fn configure(&mut self, config: GainConfig) -> Result<(), GainError> {
        config.validate()?;
        self.processor = GainProcessor::new(config.gain_db);
        self.blocks = BlockProcessor::new(config.block_size)?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &GainConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<NodeMetrics> {
        self.metrics.clone()
    }

    fn apply(&self, mut frame: DataFrame) -> Result<DataFrame, GainError> {
        // Chained stages report the total gain applied so far
        let applied = match frame.metadata.get("gain_db") {
            Some(value) => value.parse::<f64>().map_err(|_| {
                GainError::InvalidArgument(format!(
                    "frame #{} has unparsable gain_db metadata {:?}",
                    frame.sequence_id, value
                ))
            })?,
            None => 0.0,
        };

        if frame.is_planar() {
            let buffer = frame.to_buffer()?;
            let processed = self.blocks.run(&self.processor, &buffer)?;
            frame.set_buffer(processed);
        } else {
            for data in frame.payload.values_mut() {
                self.processor.apply(data);
            }
        }

        frame
            .metadata
            .insert("gain_db".to_string(), (applied + self.config.gain_db).to_string());

        Ok(frame)
    }
}

#[async_trait]
impl ProcessingNode for GainNode {
    async fn on_create(&mut self, config: Value) -> Result<()> {
        let config: GainConfig = if config.is_null() {
            GainConfig::default()
        } else {
            serde_json::from_value(config).context("Invalid Gain config")?
        };

        self.configure(config)?;
        log::debug!(
            "Gain node '{}' configured: {} dB (x{:.6}), block size {}",
            self.metrics.node_id(),
            self.config.gain_db,
            self.processor.gain_linear(),
            self.config.block_size
        );
        Ok(())
    }

    async fn process(&self, input: DataFrame) -> Result<DataFrame> {
        let start = self.metrics.start_processing();
        let sequence_id = input.sequence_id;

        let result = self.apply(input);
        self.metrics.finish_processing(start);

        match result {
            Ok(frame) => {
                self.metrics.record_frame_processed(frame.total_samples());
                Ok(frame)
            }
            Err(e) => {
                self.metrics.record_error();
                log::warn!(
                    "Gain node '{}' rejected frame #{}: {}",
                    self.metrics.node_id(),
                    sequence_id,
                    e
                );
                Err(e.into())
            }
        }
    }
}
