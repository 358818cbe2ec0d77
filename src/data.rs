use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Instant;

use polars::prelude::*;
use rustc_hash::FxHashSet as HashSet;
use tracing::debug;

use crate::error::{DashError, Result};

/// Where the movies CSV lives unless told otherwise.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/nv-thang/Data-Visualization-Course/main/movies.csv";

// movies.csv
//     name    text
//     genre   text
//     year    integer, handled as text
//     score   float, unparsable values become null
//     budget  number
//     ...     anything else is carried along untouched

const TEXT_COLUMNS: [&str; 3] = ["name", "genre", "year"];
const FLOAT_COLUMNS: [&str; 2] = ["score", "budget"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(String),
    Local(PathBuf),
}

impl From<&str> for DataSource {
    fn from(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            DataSource::Remote(s.to_string())
        } else {
            DataSource::Local(PathBuf::from(s.strip_prefix("file://").unwrap_or(s)))
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::from(DEFAULT_SOURCE)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote(url) => f.write_str(url),
            DataSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read the raw CSV bytes. Remote sources use a blocking GET with no retry.
pub fn fetch(source: &DataSource) -> Result<Vec<u8>> {
    match source {
        DataSource::Remote(url) => {
            let fetch_err = |error: reqwest::Error| DashError::Fetch {
                source_name: url.clone(),
                error,
            };
            let response = reqwest::blocking::get(url)
                .map_err(fetch_err)?
                .error_for_status()
                .map_err(fetch_err)?;
            Ok(response.bytes().map_err(fetch_err)?.to_vec())
        }
        DataSource::Local(path) => Ok(std::fs::read(path)?),
    }
}

pub struct MovieData {
    pub movies: DataFrame,
}

impl MovieData {
    pub fn load(source: &DataSource) -> Result<Self> {
        let start = Instant::now();
        let bytes = fetch(source)?;
        debug!(%source, bytes = bytes.len(), elapsed = ?start.elapsed(), "fetched movies csv");

        let data = Self::from_csv_bytes(bytes)?;
        debug!(rows = data.movies.height(), elapsed = ?start.elapsed(), "parsed movies csv");
        Ok(data)
    }

    pub fn from_csv_bytes(bytes: Vec<u8>) -> PolarsResult<Self> {
        let movies = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Self::from_frame(movies)
    }

    /// Coerce the columns the dashboard reads. Missing columns are an error,
    /// bad values are not.
    pub fn from_frame(mut movies: DataFrame) -> PolarsResult<Self> {
        for name in TEXT_COLUMNS {
            let column = movies.column(name)?.cast(&DataType::String)?;
            movies.with_column(column)?;
        }
        for name in FLOAT_COLUMNS {
            let column = movies.column(name)?.cast(&DataType::Float64)?;
            movies.with_column(column)?;
        }
        Ok(Self { movies })
    }

    /// Distinct genres in order of first appearance.
    pub fn genres(&self) -> PolarsResult<Vec<String>> {
        distinct_in_order(&self.movies, "genre")
    }

    /// Distinct years in order of first appearance.
    pub fn years(&self) -> PolarsResult<Vec<String>> {
        distinct_in_order(&self.movies, "year")
    }
}

fn distinct_in_order(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let mut seen: HashSet<&str> = HashSet::default();
    Ok(df
        .column(name)?
        .str()?
        .into_iter()
        .flatten()
        .filter(|value| seen.insert(*value))
        .map(|value| value.to_string())
        .collect())
}
