use super::pipeline::{Emission, Pipeline};
use crate::core::DataFrame;
use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

enum Command {
    Push {
        node: String,
        port: String,
        frame: DataFrame,
    },
    Tick,
}

/// Runs a [`Pipeline`] on its own task and feeds it chunk by chunk.
///
/// Every pushed chunk is followed by one tick. Emissions are forwarded as
/// they appear and can be read with [`StreamingPipeline::recv`].
pub struct StreamingPipeline {
    commands: mpsc::Sender<Command>,
    emissions: mpsc::UnboundedReceiver<Emission>,
    handle: JoinHandle<Result<Pipeline>>,
}

impl StreamingPipeline {
    pub fn spawn(pipeline: Pipeline, channel_capacity: usize) -> Self {
        let (commands, mut command_rx) = mpsc::channel(channel_capacity.max(1));
        let (emission_tx, emissions) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            let mut pipeline = pipeline;
            while let Some(command) = command_rx.recv().await {
                if let Command::Push { node, port, frame } = command {
                    pipeline.push(&node, &port, frame)?;
                }
                for emission in pipeline.execute_once()? {
                    if emission_tx.send(emission).is_err() {
                        debug!("Emission receiver dropped");
                    }
                }
            }
            debug!("Streaming input closed");
            Ok(pipeline)
        });

        info!(channel_capacity, "Streaming pipeline started");
        Self {
            commands,
            emissions,
            handle,
        }
    }

    /// Push a chunk into `node.port`; waits while the input channel is full
    pub async fn send(&self, node: &str, port: &str, frame: impl Into<DataFrame>) -> Result<()> {
        let command = Command::Push {
            node: node.to_string(),
            port: port.to_string(),
            frame: frame.into(),
        };
        self.commands
            .send(command)
            .await
            .map_err(|_| anyhow!("Streaming pipeline has stopped"))
    }

    /// Run one tick without new input, e.g. to start source nodes
    pub async fn tick(&self) -> Result<()> {
        self.commands
            .send(Command::Tick)
            .await
            .map_err(|_| anyhow!("Streaming pipeline has stopped"))
    }

    pub async fn recv(&mut self) -> Option<Emission> {
        self.emissions.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Emission> {
        self.emissions.try_recv().ok()
    }

    /// Close the input, wait for queued chunks to be processed and hand back
    /// the pipeline with every emission not yet received
    pub async fn shutdown(self) -> Result<(Pipeline, Vec<Emission>)> {
        let Self {
            commands,
            mut emissions,
            handle,
        } = self;
        drop(commands);

        let pipeline = match handle.await? {
            Ok(pipeline) => pipeline,
            Err(error) => {
                warn!(%error, "Streaming pipeline failed");
                return Err(error);
            }
        };

        let mut remaining = Vec::new();
        while let Some(emission) = emissions.recv().await {
            remaining.push(emission);
        }

        info!(remaining = remaining.len(), "Streaming pipeline stopped");
        Ok((pipeline, remaining))
    }
}
