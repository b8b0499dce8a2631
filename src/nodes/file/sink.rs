use super::csv_file_path;
use crate::core::{ChannelKey, NodeError, NodeResult, Parameters, PortBuffer, Transform};
use biopipe_macros::PipelineNode;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const INPUT_MAIN: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFileOutputConfig {
    pub node: String,
    pub file_path: PathBuf,
}

/// Appends every buffered sample to a CSV file, one row per sample.
///
/// The file is created (or truncated) on the first write. The header is
/// taken from the channels of the first batch; later batches are written in
/// that column order, with empty cells for channels they lack.
#[derive(PipelineNode)]
#[node_meta(name = "CSVFileOutput", module = "node.output.file.csvfile", category = "Sinks")]
pub struct CsvFileOutput {
    #[input(name = "main", data_type = "samples")]
    _main_in: (),

    config: CsvFileOutputConfig,
    writer: Option<csv::Writer<File>>,
    columns: Option<Vec<ChannelKey>>,
}

impl CsvFileOutput {
    pub fn new(config: CsvFileOutputConfig) -> Self {
        Self {
            _main_in: (),
            config,
            writer: None,
            columns: None,
        }
    }

    pub fn config(&self) -> &CsvFileOutputConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    fn io_error(&self, source: std::io::Error) -> NodeError {
        NodeError::Io {
            node: self.config.node.clone(),
            source,
        }
    }

    fn open(&self) -> NodeResult<csv::Writer<File>> {
        let path = &self.config.file_path;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let file = File::create(path).map_err(|source| self.io_error(source))?;

        info!(node = %self.config.node, path = %path.display(), "CSV output opened");
        Ok(csv::Writer::from_writer(file))
    }
}

impl Transform for CsvFileOutput {
    type Config = CsvFileOutputConfig;

    fn validate_parameters(params: &Parameters<'_>) -> NodeResult<CsvFileOutputConfig> {
        Ok(CsvFileOutputConfig {
            node: params.node().to_string(),
            file_path: csv_file_path(params)?,
        })
    }

    fn initialize_parameter_fields(config: CsvFileOutputConfig) -> Self {
        Self::new(config)
    }

    fn is_processing_condition_satisfied(&self, input: &PortBuffer) -> bool {
        input.samples(INPUT_MAIN).map_or(false, |data| data.data_count() > 0)
    }

    fn process(&mut self, input: &PortBuffer) -> NodeResult<PortBuffer> {
        let Some(data) = input.samples(INPUT_MAIN) else {
            return Ok(PortBuffer::new());
        };

        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => self.open()?,
        };
        let writer = self.writer.insert(writer);

        let columns = match &self.columns {
            Some(columns) => columns.clone(),
            None => {
                let columns: Vec<ChannelKey> = data.channel_keys().cloned().collect();
                writer
                    .write_record(columns.iter().map(ToString::to_string))
                    .map_err(|source| NodeError::Csv {
                        node: self.config.node.clone(),
                        source,
                    })?;
                self.columns = Some(columns.clone());
                columns
            }
        };

        for index in 0..data.data_count() {
            let row = columns.iter().map(|key| {
                data.channel(key)
                    .and_then(|samples| samples.get(index))
                    .map(f64::to_string)
                    .unwrap_or_default()
            });
            writer.write_record(row).map_err(|source| NodeError::Csv {
                node: self.config.node.clone(),
                source,
            })?;
        }
        writer.flush().map_err(|source| NodeError::Io {
            node: self.config.node.clone(),
            source,
        })?;

        debug!(node = %self.config.node, rows = data.data_count(), "Rows written");
        Ok(PortBuffer::new())
    }

    fn dispose(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(error) = writer.flush() {
                let error = self.io_error(error);
                warn!(node = %self.config.node, %error, "Failed to flush CSV output");
            }
            info!(node = %self.config.node, "CSV output closed");
        }
    }
}
