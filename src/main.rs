use anyhow::Result;
use biopipe::core::{DataFrame, SampleSeries};
use biopipe::engine::{Emission, Pipeline, StreamingPipeline};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MAX_TICKS: usize = 1024;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match std::env::args().nth(1) {
        Some(path) => run_file(&path),
        None => run_demo().await,
    }
}

fn log_emission(emission: &Emission) {
    info!(
        node = %emission.node,
        port = %emission.port,
        kind = %emission.frame.kind(),
        channels = emission.frame.channel_count(),
        count = emission.frame.data_count(),
        "Emission"
    );
}

fn run_file(path: &str) -> Result<()> {
    let mut pipeline = Pipeline::from_file(path)?;
    info!(order = ?pipeline.execution_order(), "Running {}", path);

    let emissions = pipeline.run_until_idle(MAX_TICKS)?;
    emissions.iter().for_each(log_emission);
    pipeline.dispose();

    info!(emissions = emissions.len(), "Done");
    Ok(())
}

/// Streams a synthetic two-channel signal through a segmenter, and a label
/// track through Interpolate and Data Replicate
async fn run_demo() -> Result<()> {
    let pipeline = Pipeline::from_json(json!({
        "nodes": [
            {
                "id": "segmenter",
                "type": "SlidingWindowSegmenter",
                "config": {"window_size": 8, "step_size": 4, "filling_value": "latest"}
            },
            {
                "id": "labels",
                "type": "Interpolate",
                "config": {"window_size": 8, "sliding_window": true, "step_size": 4}
            },
            {
                "id": "replicate",
                "type": "DataReplicate",
                "config": {"data_repetition_count": 4, "use_extra_data": true, "extra_data": 2}
            }
        ],
        "connections": [
            {"from": "labels", "to": "replicate"}
        ]
    }))?;

    let mut streaming = StreamingPipeline::spawn(pipeline, 16);
    let sampling_frequency = Some(64.0);

    for chunk in 0..4 {
        let offset = chunk * 16;
        let samples = SampleSeries::from_channels(
            sampling_frequency,
            [
                ("Fz", (offset..offset + 16).map(|n| (n as f64 * 0.2).sin()).collect::<Vec<_>>()),
                ("Cz", (offset..offset + 16).map(|n| (n as f64 * 0.3).cos()).collect::<Vec<_>>()),
            ],
        );
        streaming.send("segmenter", "main", samples).await?;

        let labels = SampleSeries::from_channels(
            Some(16.0),
            [("label", vec![(chunk % 2) as f64, ((chunk + 1) % 2) as f64])],
        );
        streaming.send("labels", "main", DataFrame::from(labels)).await?;

        while let Some(emission) = streaming.try_recv() {
            log_emission(&emission);
        }
    }

    let (mut pipeline, remaining) = streaming.shutdown().await?;
    remaining.iter().for_each(log_emission);
    pipeline.dispose();
    Ok(())
}
