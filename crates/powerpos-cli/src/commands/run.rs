use std::env;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use powerpos_core::{
    parse_trade_date, parse_zone, CsvReportSink, JsonFileTradeSource, Pipeline, PipelineConfig,
    SimulatedTradeSource, TradeSource, ValidationError,
};
use uuid::Uuid;

use crate::cli::RunArgs;
use crate::error::CliError;

use super::RunReport;

const HOME_ENV: &str = "POWERPOS_HOME";
const REPORTS_DIR: &str = "reports";

pub async fn run(args: &RunArgs) -> Result<RunReport, CliError> {
    let config = apply_flags(PipelineConfig::from_env()?, args)?;
    let trade_date = match args.date.as_deref() {
        Some(raw) => parse_trade_date(raw)?,
        None => Utc::now().with_timezone(&config.input_zone).date_naive(),
    };
    let sink = CsvReportSink::new(resolve_output_dir(args.output_dir.as_deref()));

    let source: Box<dyn TradeSource> = match &args.input {
        Some(path) => Box::new(JsonFileTradeSource::new(path)),
        None => Box::new(simulated_source(args)),
    };

    execute(&config, source.as_ref(), &sink, trade_date).await
}

/// Flag values override whatever the environment configured.
fn apply_flags(
    mut config: PipelineConfig,
    args: &RunArgs,
) -> Result<PipelineConfig, ValidationError> {
    if let Some(zone) = args.input_tz.as_deref() {
        config.input_zone = parse_zone(zone)?;
    }
    if let Some(zone) = args.output_tz.as_deref() {
        config.output_zone = parse_zone(zone)?;
    }
    if let Some(run_time) = &args.run_time {
        config.run_time = run_time.clone();
    }
    Ok(config)
}

fn simulated_source(args: &RunArgs) -> SimulatedTradeSource {
    let source = match args.seed {
        Some(seed) => SimulatedTradeSource::with_seed(seed),
        None => SimulatedTradeSource::new(),
    };
    match args.max_positions {
        Some(max_positions) => source.with_max_positions(max_positions),
        None => source,
    }
}

async fn execute(
    config: &PipelineConfig,
    source: &dyn TradeSource,
    sink: &CsvReportSink,
    trade_date: NaiveDate,
) -> Result<RunReport, CliError> {
    let run_id = Uuid::new_v4();
    tracing::info!(
        %run_id,
        source = source.name(),
        %trade_date,
        output_dir = %sink.output_dir().display(),
        "starting power position run"
    );

    let pipeline = Pipeline::new(config);
    let (output, files) = pipeline
        .run_day(source, sink, trade_date, &config.run_time)
        .await?;

    let mut report = RunReport {
        run_id,
        generated_at: Utc::now(),
        source: source.name(),
        trade_date,
        run_time: config.run_time.trim().to_owned(),
        input_zone: config.input_zone.name().to_owned(),
        output_zone: config.output_zone.name().to_owned(),
        batches: output.batches,
        validated_rows: output.validated_rows,
        valid_rows: output.valid_rows,
        exception_rows: output.exceptions.len(),
        identifiers: output.quality_summary.len(),
        buckets: output.aggregated.len(),
        files,
        warnings: Vec::new(),
    };

    if !output.exceptions.is_empty() {
        let warning = format!(
            "{} exception rows across {} identifiers, see {}",
            output.exceptions.len(),
            output.quality_summary.len(),
            report.files.data_profiling.display()
        );
        report = report.with_warning(warning);
    }
    if output.aggregated.is_empty() {
        report = report.with_warning("no valid rows, aggregated report holds the header only");
    }
    Ok(report)
}

fn resolve_output_dir(flag: Option<&Path>) -> PathBuf {
    match flag {
        Some(path) => path.to_path_buf(),
        None => resolve_powerpos_home().join(REPORTS_DIR),
    }
}

fn resolve_powerpos_home() -> PathBuf {
    if let Some(path) = env::var_os(HOME_ENV) {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".powerpos");
    }

    PathBuf::from(".powerpos")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono_tz::Tz;
    use tempfile::tempdir;

    use super::*;

    fn trade_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 8, 1).expect("valid date")
    }

    #[test]
    fn flags_override_configured_values() {
        let args = RunArgs {
            input_tz: Some(String::from("Asia/Tokyo")),
            output_tz: Some(String::from("Europe/Paris")),
            run_time: Some(String::from("1830")),
            ..RunArgs::default()
        };

        let config = apply_flags(PipelineConfig::default(), &args).expect("valid flags");

        assert_eq!(config.input_zone, Tz::Asia__Tokyo);
        assert_eq!(config.output_zone, Tz::Europe__Paris);
        assert_eq!(config.run_time, "1830");
    }

    #[test]
    fn absent_flags_keep_configured_values() {
        let config = apply_flags(PipelineConfig::default(), &RunArgs::default()).expect("config");
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn unknown_zone_flag_is_a_validation_error() {
        let args = RunArgs {
            output_tz: Some(String::from("Nowhere/Special")),
            ..RunArgs::default()
        };
        let err = apply_flags(PipelineConfig::default(), &args).expect_err("must fail");
        assert!(matches!(err, ValidationError::UnknownTimeZone { .. }));
    }

    #[test]
    fn explicit_output_dir_wins() {
        let dir = resolve_output_dir(Some(Path::new("/tmp/positions")));
        assert_eq!(dir, PathBuf::from("/tmp/positions"));
    }

    #[test]
    fn default_output_dir_ends_in_reports() {
        assert!(resolve_output_dir(None).ends_with(REPORTS_DIR));
    }

    #[tokio::test]
    async fn execute_reports_counts_and_written_files() {
        let temp = tempdir().expect("tempdir");
        let sink = CsvReportSink::new(temp.path());
        let source = SimulatedTradeSource::with_seed(9).with_max_positions(2);

        let report = execute(&PipelineConfig::default(), &source, &sink, trade_date())
            .await
            .expect("run succeeds");

        assert_eq!(report.source, "simulated");
        assert_eq!(report.trade_date, trade_date());
        assert_eq!(report.input_zone, "Europe/London");
        assert_eq!(report.output_zone, "UTC");
        assert_eq!(report.identifiers, report.batches);
        assert_eq!(report.valid_rows + report.exception_rows, report.validated_rows);
        assert!(report
            .files
            .aggregated
            .ends_with("PowerPosition_20220801_0000.csv"));
        assert!(fs::metadata(&report.files.data_quality).is_ok());
        assert!(!report.warnings.is_empty());
    }

    #[tokio::test]
    async fn execute_surfaces_source_failures() {
        let temp = tempdir().expect("tempdir");
        let sink = CsvReportSink::new(temp.path());
        let source = JsonFileTradeSource::new(temp.path().join("missing.json"));

        let err = execute(&PipelineConfig::default(), &source, &sink, trade_date())
            .await
            .expect_err("must fail");

        assert_eq!(err.exit_code(), 3);
    }
}
