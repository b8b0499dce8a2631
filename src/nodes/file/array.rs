use super::has_csv_extension;
use super::source::{read_csv, CsvColumns, OUTPUT_MAIN, OUTPUT_TIMESTAMP};
use crate::core::{NodeResult, Parameters, PortBuffer, SampleSeries, Transform};
use biopipe_macros::PipelineNode;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct CsvFileArrayConfig {
    pub node: String,
    /// Read in order, at least one
    pub file_paths: Vec<PathBuf>,
    pub sampling_frequency: f64,
    pub timestamp_column_name: Option<String>,
    pub channel_column_names: Option<Vec<String>>,
}

/// Reads several CSV files on its first run and emits them as one recording.
///
/// Rows are appended file after file on `main` and `timestamp`. Without
/// configured channel columns the columns of the first file are used for all
/// files. A generated timestamp is the row index within each file.
#[derive(PipelineNode, Debug)]
#[node_meta(name = "CSVFileArray", module = "node.generator.file.csvfilearray", category = "Generators")]
pub struct CsvFileArray {
    #[output(name = "main", data_type = "samples")]
    _main_out: (),

    #[output(name = "timestamp", data_type = "samples")]
    _timestamp_out: (),

    config: CsvFileArrayConfig,
    exhausted: bool,
}

impl CsvFileArray {
    pub fn new(config: CsvFileArrayConfig) -> Self {
        Self {
            _main_out: (),
            _timestamp_out: (),
            config,
            exhausted: false,
        }
    }
}

impl Transform for CsvFileArray {
    type Config = CsvFileArrayConfig;

    fn validate_parameters(params: &Parameters<'_>) -> NodeResult<CsvFileArrayConfig> {
        params.require_all(&["sampling_frequency", "file_path"])?;

        let sampling_frequency = params.require_number("sampling_frequency")?;
        let entries = params
            .require("file_path")?
            .as_array()
            .ok_or_else(|| params.invalid("file_path", "must_be_list"))?;
        if entries.is_empty() {
            return Err(params.invalid("file_path", "must_be_have_items"));
        }

        let mut file_paths = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let Some(file_path) = entry.as_str() else {
                return Err(params.invalid(&format!("file_path[{}]", index), "must_be_string"));
            };
            let parameter = format!("file_path[{}]", file_path);
            let path = PathBuf::from(file_path);
            if !has_csv_extension(&path) {
                return Err(params.invalid(&parameter, "must_be_csv_file"));
            }
            if !path.exists() {
                return Err(params.invalid(&parameter, "file_doesnt_exist"));
            }
            file_paths.push(path);
        }

        Ok(CsvFileArrayConfig {
            node: params.node().to_string(),
            file_paths,
            sampling_frequency,
            timestamp_column_name: params.optional_str("timestamp_column_name")?.map(str::to_string),
            channel_column_names: params.optional_str_list("channel_column_names")?,
        })
    }

    fn initialize_parameter_fields(config: CsvFileArrayConfig) -> Self {
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
        let mut channel_names = config.channel_column_names.clone();
        let mut recording: Option<(SampleSeries, SampleSeries)> = None;

        for path in &config.file_paths {
            let (main, timestamps) = read_csv(
                &config.node,
                path,
                CsvColumns {
                    sampling_frequency: config.sampling_frequency,
                    timestamp_column_name: config.timestamp_column_name.as_deref(),
                    channel_column_names: channel_names.as_deref(),
                },
            )?;
            debug!(node = %config.node, path = %path.display(), rows = timestamps.data_count(), "CSV file read");

            match &mut recording {
                Some((all_main, all_timestamps)) => {
                    all_main.append(main);
                    all_timestamps.append(timestamps);
                }
                None => {
                    if channel_names.is_none() {
                        channel_names = Some(main.channel_keys().map(ToString::to_string).collect());
                    }
                    recording = Some((main, timestamps));
                }
            }
        }

        let mut output = PortBuffer::new();
        if let Some((main, timestamps)) = recording {
            info!(
                node = %config.node,
                files = config.file_paths.len(),
                rows = timestamps.data_count(),
                channels = main.channel_count(),
                "CSV file array read"
            );
            output.insert(OUTPUT_MAIN, main);
            output.insert(OUTPUT_TIMESTAMP, timestamps);
        }
        Ok(output)
    }
}
