use playdsp::core::{DataFrame, SampleBuffer};
use playdsp::engine::Pipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = serde_json::json!({
        "nodes": [
            {
                "id": "attenuate",
                "type": "Gain",
                "config": {
                    "gain_db": -12.0,
                    "block_size": 2048
                }
            }
        ],
        "connections": []
    });

    log::info!("Building pipeline from config...");
    let pipeline = Pipeline::from_json(config).await?;

    // Two channels of two samples, channel-major
    let input = SampleBuffer::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2)?;
    println!("Input:  {:?}", input.as_slice());

    let output = pipeline.execute(DataFrame::from_buffer(input, 0, 0)).await?;
    let buffer = output.to_buffer()?;
    println!("Output: {:?}", buffer.as_slice());

    for node_id in pipeline.order() {
        if let Some(metrics) = pipeline.metrics(node_id) {
            println!("Metrics: {}", serde_json::to_string(&metrics.snapshot())?);
            metrics.reset();
        }
    }

    Ok(())
}
