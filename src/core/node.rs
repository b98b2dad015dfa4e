use super::DataFrame;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

/// Base trait for all processing nodes in the pipeline
#[async_trait]
pub trait ProcessingNode: Send + Sync {
    /// Called once when node is instantiated with config from JSON
    async fn on_create(&mut self, config: Value) -> Result<()>;

    /// Process a single frame
    async fn process(&self, input: DataFrame) -> Result<DataFrame>;

    /// Streaming loop: receives frames from rx, processes them, sends to tx.
    /// Returns when rx is closed or the downstream receiver is gone.
    async fn run(
        &self,
        mut rx: mpsc::Receiver<DataFrame>,
        tx: mpsc::Sender<DataFrame>,
    ) -> Result<()> {
        while let Some(frame) = rx.recv().await {
            let output = self.process(frame).await?;
            if tx.send(output).await.is_err() {
                log::debug!("Downstream receiver dropped, stopping node loop");
                break;
            }
        }
        Ok(())
    }
}
