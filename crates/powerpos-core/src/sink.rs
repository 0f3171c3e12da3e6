//! Persistence of the three result tables as delimited text files.
//!
//! | File | Content |
//! |------|---------|
//! | `PowerPosition_<YYYYMMDD>_<HHMM>.csv` | Hourly aggregated volumes |
//! | `PowerPosition_<YYYYMMDD>_<HHMM>_data_profiling.csv` | Exception rows |
//! | `PowerPosition_<YYYYMMDD>_<HHMM>_data_quality.csv` | Per-id quality summary |

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::domain::{QualityFlag, RunTag, TradeRecord};
use crate::pipeline::PipelineOutput;

const AGGREGATED_SUFFIX: &str = "";
const PROFILING_SUFFIX: &str = "_data_profiling";
const QUALITY_SUFFIX: &str = "_data_quality";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Paths written for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedReports {
    pub aggregated: PathBuf,
    pub data_profiling: PathBuf,
    pub data_quality: PathBuf,
}

/// Receives the three result tables of a run.
pub trait ReportSink {
    fn save(&self, tag: &RunTag, output: &PipelineOutput) -> Result<SavedReports, SinkError>;
}

/// Writes result tables as CSV files into one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReportSink {
    output_dir: PathBuf,
}

impl CsvReportSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Target paths for `tag`, whether or not they exist yet.
    pub fn paths(&self, tag: &RunTag) -> SavedReports {
        let stem = tag.file_stem();
        let path = |suffix: &str| self.output_dir.join(format!("{stem}{suffix}.csv"));
        SavedReports {
            aggregated: path(AGGREGATED_SUFFIX),
            data_profiling: path(PROFILING_SUFFIX),
            data_quality: path(QUALITY_SUFFIX),
        }
    }

    fn write_aggregated(path: &Path, output: &PipelineOutput) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["Local Time", "Volume"])?;
        for bucket in &output.aggregated {
            writer.write_record([bucket.local_time.clone(), bucket.volume.to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_profiling(path: &Path, output: &PipelineOutput) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        let mut header = vec!["date", "time", "volume", "id"];
        header.extend(QualityFlag::ALL.iter().map(|flag| flag.as_str()));
        writer.write_record(&header)?;

        for row in &output.exceptions {
            let TradeRecord {
                id,
                date,
                time,
                volume,
            } = &row.record;
            let mut record = vec![
                date.clone(),
                time.clone().unwrap_or_default(),
                volume.clone().unwrap_or_default(),
                id.clone(),
            ];
            record.extend(QualityFlag::ALL.iter().map(|flag| row.flags.get(*flag).to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_quality(path: &Path, output: &PipelineOutput) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "id",
            "missing_time_count",
            "invalid_time_format_count",
            "unexpected_time_count",
            "invalid_volume_count",
            "time_min",
            "time_max",
        ])?;
        for summary in &output.quality_summary {
            writer.write_record([
                summary.id.clone(),
                summary.missing_time_count.to_string(),
                summary.invalid_time_format_count.to_string(),
                summary.unexpected_time_count.to_string(),
                summary.invalid_volume_count.to_string(),
                summary.time_min.clone().unwrap_or_default(),
                summary.time_max.clone().unwrap_or_default(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl ReportSink for CsvReportSink {
    fn save(&self, tag: &RunTag, output: &PipelineOutput) -> Result<SavedReports, SinkError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| SinkError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let paths = self.paths(tag);
        let writes: [(&Path, fn(&Path, &PipelineOutput) -> Result<(), csv::Error>); 3] = [
            (paths.aggregated.as_path(), Self::write_aggregated),
            (paths.data_profiling.as_path(), Self::write_profiling),
            (paths.data_quality.as_path(), Self::write_quality),
        ];
        for (path, write) in writes {
            write(path, output).map_err(|source| SinkError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        tracing::info!(
            output_dir = %self.output_dir.display(),
            stem = %tag,
            buckets = output.aggregated.len(),
            exceptions = output.exceptions.len(),
            identifiers = output.quality_summary.len(),
            "saved run results"
        );
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::*;

    fn tag() -> RunTag {
        RunTag::new(NaiveDate::from_ymd_opt(2022, 8, 1).expect("date"), "0000").expect("tag")
    }

    #[test]
    fn names_files_after_run_tag() {
        let sink = CsvReportSink::new("/data/out");
        let paths = sink.paths(&tag());
        assert_eq!(paths.aggregated, Path::new("/data/out/PowerPosition_20220801_0000.csv"));
        assert_eq!(
            paths.data_profiling,
            Path::new("/data/out/PowerPosition_20220801_0000_data_profiling.csv")
        );
        assert_eq!(
            paths.data_quality,
            Path::new("/data/out/PowerPosition_20220801_0000_data_quality.csv")
        );
    }

    #[test]
    fn writes_headers_for_empty_output() {
        let temp = tempdir().expect("tempdir");
        let sink = CsvReportSink::new(temp.path().join("nested"));
        let saved = sink.save(&tag(), &PipelineOutput::default()).expect("save");

        let aggregated = fs::read_to_string(saved.aggregated).expect("read");
        assert_eq!(aggregated, "Local Time,Volume\n");
        let profiling = fs::read_to_string(saved.data_profiling).expect("read");
        assert_eq!(
            profiling,
            "date,time,volume,id,invalid_time_format,invalid_volume,unexpected_time,missing_time\n"
        );
        let quality = fs::read_to_string(saved.data_quality).expect("read");
        assert!(quality.starts_with("id,missing_time_count,"));
    }
}
