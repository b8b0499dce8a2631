use super::csv_file_path;
use crate::core::{NodeError, NodeResult, Parameters, PortBuffer, SampleSeries, Transform};
use biopipe_macros::PipelineNode;
use std::path::{Path, PathBuf};
use tracing::info;

pub const OUTPUT_MAIN: &str = "main";
pub const OUTPUT_TIMESTAMP: &str = "timestamp";

/// Channel name used on the `timestamp` output
pub const TIMESTAMP_CHANNEL: &str = "timestamp";

#[derive(Debug, Clone, PartialEq)]
pub struct CsvFileConfig {
    pub node: String,
    pub file_path: PathBuf,
    pub sampling_frequency: f64,
    pub timestamp_column_name: Option<String>,
    /// Columns read as channels; every non-timestamp column when absent
    pub channel_column_names: Option<Vec<String>>,
}

/// Reads a whole CSV file on its first run and emits it once.
///
/// `main` carries one channel per selected column, `timestamp` carries the
/// timestamp column, or the row index when no timestamp column is configured.
#[derive(PipelineNode, Debug)]
#[node_meta(name = "CSVFile", module = "node.generator.file.csvfile", category = "Generators")]
pub struct CsvFile {
    #[output(name = "main", data_type = "samples")]
    _main_out: (),

    #[output(name = "timestamp", data_type = "samples")]
    _timestamp_out: (),

    config: CsvFileConfig,
    exhausted: bool,
}

impl CsvFile {
    pub fn new(config: CsvFileConfig) -> Self {
        Self {
            _main_out: (),
            _timestamp_out: (),
            config,
            exhausted: false,
        }
    }
}

/// Columns to read and how to label them
#[derive(Debug, Clone, Copy)]
pub(super) struct CsvColumns<'c> {
    pub sampling_frequency: f64,
    pub timestamp_column_name: Option<&'c str>,
    /// Every non-timestamp column when absent
    pub channel_column_names: Option<&'c [String]>,
}

/// Read every row of `path` into a `main` series (one channel per selected
/// column) and a `timestamp` series.
///
/// Without a timestamp column the row index, starting at 0, is used.
pub(super) fn read_csv(
    node: &str,
    path: &Path,
    columns: CsvColumns<'_>,
) -> NodeResult<(SampleSeries, SampleSeries)> {
    let csv_error = |source: csv::Error| NodeError::Csv {
        node: node.to_string(),
        source,
    };
    let invalid_data = |reason: String| NodeError::InvalidData {
        node: node.to_string(),
        reason,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();

    let column_index = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| invalid_data(format!("{}: column `{}` not found", path.display(), name)))
    };

    let timestamp_column = columns.timestamp_column_name.map(column_index).transpose()?;
    let channel_names: Vec<String> = match columns.channel_column_names {
        Some(names) => names.to_vec(),
        None => headers
            .iter()
            .filter(|header| Some(*header) != columns.timestamp_column_name)
            .map(str::to_string)
            .collect(),
    };
    let channel_columns = channel_names
        .iter()
        .map(|name| column_index(name))
        .collect::<NodeResult<Vec<_>>>()?;

    let frequency = Some(columns.sampling_frequency);
    let mut main = SampleSeries::with_channels(frequency, channel_names.iter().map(String::as_str));
    let mut timestamps = SampleSeries::with_channels(frequency, [TIMESTAMP_CHANNEL]);

    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let cell = |column: usize| -> NodeResult<f64> {
            let raw = record.get(column).unwrap_or("").trim();
            raw.parse::<f64>().map_err(|_| {
                invalid_data(format!(
                    "row {}, column `{}`: `{}` is not a number",
                    row_index + 1,
                    &headers[column],
                    raw
                ))
            })
        };

        for (name, &column) in channel_names.iter().zip(&channel_columns) {
            main.push(name.as_str(), cell(column)?);
        }
        let timestamp = match timestamp_column {
            Some(column) => cell(column)?,
            None => row_index as f64,
        };
        timestamps.push(TIMESTAMP_CHANNEL, timestamp);
    }

    Ok((main, timestamps))
}

impl Transform for CsvFile {
    type Config = CsvFileConfig;

    fn validate_parameters(params: &Parameters<'_>) -> NodeResult<CsvFileConfig> {
        params.require_all(&["sampling_frequency", "file_path"])?;

        let sampling_frequency = params.require_number("sampling_frequency")?;
        let file_path = csv_file_path(params)?;
        if !file_path.exists() {
            return Err(params.invalid("file_path", "file_doesnt_exist"));
        }

        Ok(CsvFileConfig {
            node: params.node().to_string(),
            file_path,
            sampling_frequency,
            timestamp_column_name: params.optional_str("timestamp_column_name")?.map(str::to_string),
            channel_column_names: params.optional_str_list("channel_column_names")?,
        })
    }

    fn initialize_parameter_fields(config: CsvFileConfig) -> Self {
        Self::new(config)
    }

    fn is_processing_condition_satisfied(&self, _input: &PortBuffer) -> bool {
        !self.exhausted
    }

    fn is_next_node_call_enabled(&self, output: &PortBuffer) -> bool {
        output.has_data(OUTPUT_TIMESTAMP)
    }

    fn process(&mut self, _input: &PortBuffer) -> NodeResult<PortBuffer> {
        self.exhausted = true;
        let config = &self.config;
        let (main, timestamps) = read_csv(
            &config.node,
            &config.file_path,
            CsvColumns {
                sampling_frequency: config.sampling_frequency,
                timestamp_column_name: config.timestamp_column_name.as_deref(),
                channel_column_names: config.channel_column_names.as_deref(),
            },
        )?;

        info!(
            node = %self.config.node,
            path = %self.config.file_path.display(),
            rows = timestamps.data_count(),
            channels = main.channel_count(),
            "CSV file read"
        );

        Ok(PortBuffer::new()
            .with(OUTPUT_MAIN, main)
            .with(OUTPUT_TIMESTAMP, timestamps))
    }
}
