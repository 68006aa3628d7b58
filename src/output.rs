use std::{fs::File, path::Path};

use polars::prelude::*;

use crate::{
    error::{FeatureError, Result},
    extraction::{Row, SampleFailure},
};

/**
Build the output table : `id`, `partition`, `label` then one f64 column per feature.
# Arguments
* `rows` - the extracted rows, every vector must have `columns.len()` values
* `columns` - the feature column names
 */
pub(crate) fn to_dataframe(rows: &[Row], columns: &[String]) -> Result<DataFrame> {
    let mut series = vec![
        Series::new("id", rows.iter().map(|row| row.id.as_str()).collect::<Vec<_>>()),
        Series::new("partition", rows.iter().map(|row| row.partition.as_str()).collect::<Vec<_>>()),
        Series::new("label", rows.iter().map(|row| row.label.as_str()).collect::<Vec<_>>()),
    ];
    for (i, name) in columns.iter().enumerate() {
        let values = rows.iter().map(|row| row.vector[i]).collect::<Vec<f64>>();
        series.push(Series::new(name, values));
    }
    Ok(DataFrame::new(series)?)
}

/// The format is picked from the extension of `path`
pub(crate) fn write_dataframe(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_lowercase();
    if !matches!(extension.as_str(), "csv" | "parquet" | "ipc" | "arrow" | "json") {
        return Err(FeatureError::ConfigurationMismatch(format!(
            "unsupported output format : {:?}",
            path
        )));
    }

    let file = File::create(path)?;
    match extension.as_str() {
        "csv" => {
            CsvWriter::new(file).has_header(true).finish(df)?;
        }
        "parquet" => {
            ParquetWriter::new(file).finish(df)?;
        }
        "ipc" | "arrow" => {
            IpcWriter::new(file).finish(df)?;
        }
        _ => {
            JsonWriter::new(file).with_json_format(JsonFormat::Json).finish(df)?;
        }
    }
    Ok(())
}

pub(crate) fn write_failures(failures: &[SampleFailure], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, failures)?;
    Ok(())
}
