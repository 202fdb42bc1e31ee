//! Table loading from CSV and Parquet files.
//!
//! Load failures are fatal to a run: every error here propagates to the caller
//! unchanged and there is no fallback.

use crate::error::{QualityError, Result};
use polars::error::PolarsError;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supported on-disk table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "parquet" | "pq" => Ok(FileFormat::Parquet),
            _ => Err(QualityError::UnsupportedFormat {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    format!(".{}", extension)
                },
            }),
        }
    }
}

/// Descriptive metadata about a loaded table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub table_name: String,
    /// Absolute path of the source file.
    pub file_path: PathBuf,
    pub file_format: FileFormat,
    pub file_size_bytes: u64,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<String>,
}

/// A table held fully in memory together with its metadata.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub df: DataFrame,
    pub metadata: TableMetadata,
}

/// Loads tables from disk.
pub struct TableLoader;

impl TableLoader {
    /// Load a table and describe it.
    ///
    /// # Errors
    ///
    /// - [`QualityError::NotFound`] if the path does not exist
    /// - [`QualityError::UnsupportedFormat`] for extensions other than csv, parquet, pq
    /// - [`QualityError::EmptyTable`] for a zero-byte file or a file without data
    /// - [`QualityError::ParseFailure`] for any other reader error
    pub fn load(path: impl AsRef<Path>, table_name: &str) -> Result<LoadedTable> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(QualityError::NotFound(path.display().to_string()));
        }

        let file_format = FileFormat::from_path(path)?;
        let file_size_bytes = std::fs::metadata(path)?.len();
        if file_size_bytes == 0 {
            return Err(QualityError::EmptyTable(path.display().to_string()));
        }

        info!("Loading {:?} table from: {}", file_format, path.display());
        let df = match file_format {
            FileFormat::Csv => Self::read_csv(path),
            FileFormat::Parquet => Self::read_parquet(path),
        }
        .map_err(|e| Self::classify_error(path, e))?;
        debug!("Loaded table shape: {:?}", df.shape());

        let file_path = std::fs::canonicalize(path)?;
        let columns = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        Ok(LoadedTable {
            metadata: TableMetadata {
                table_name: table_name.to_string(),
                file_path,
                file_format,
                file_size_bytes,
                row_count: df.height(),
                column_count: df.width(),
                columns,
            },
            df,
        })
    }

    /// Schema inference scans every row so a column that changes kind late
    /// in the file still loads.
    fn read_csv(path: &Path) -> PolarsResult<DataFrame> {
        CsvReadOptions::default()
            .with_infer_schema_length(None)
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
    }

    fn read_parquet(path: &Path) -> PolarsResult<DataFrame> {
        let file = File::open(path)?;
        ParquetReader::new(file).finish()
    }

    fn classify_error(path: &Path, error: PolarsError) -> QualityError {
        match error {
            PolarsError::NoData(_) => QualityError::EmptyTable(path.display().to_string()),
            other => QualityError::ParseFailure {
                path: path.display().to_string(),
                reason: other.to_string(),
            },
        }
    }
}
