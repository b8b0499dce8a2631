//! CSV backed source and sink nodes.

pub mod array;
pub mod sink;
pub mod source;

pub use array::{CsvFileArray, CsvFileArrayConfig};
pub use sink::{CsvFileOutput, CsvFileOutputConfig};
pub use source::{CsvFile, CsvFileConfig, TIMESTAMP_CHANNEL};

use crate::core::{NodeResult, Parameters};
use std::path::{Path, PathBuf};

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .map_or(false, |extension| extension.eq_ignore_ascii_case("csv"))
}

/// Read `file_path` and require a `.csv` extension
fn csv_file_path(params: &Parameters<'_>) -> NodeResult<PathBuf> {
    let file_path = params.require_str("file_path", "must_be_string")?;
    let path = Path::new(file_path);
    if !has_csv_extension(path) {
        return Err(params.invalid("file_path", "must_be_csv_file"));
    }
    Ok(path.to_path_buf())
}
