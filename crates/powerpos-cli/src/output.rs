use std::io::{self, Write};

use crate::cli::OutputFormat;
use crate::commands::RunReport;
use crate::error::CliError;

pub fn render(report: &RunReport, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    write_report(&mut stdout.lock(), report, format, pretty)
}

fn write_report(
    out: &mut impl Write,
    report: &RunReport,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => write!(out, "{}", render_table(report))?,
    }

    out.flush()?;
    Ok(())
}

fn render_table(report: &RunReport) -> String {
    let mut lines = vec![
        format!("run_id        : {}", report.run_id),
        format!("generated_at  : {}", report.generated_at.to_rfc3339()),
        format!("source        : {}", report.source),
        format!("trade_date    : {}", report.trade_date.format("%d/%m/%Y")),
        format!("run_time      : {}", report.run_time),
        format!("zones         : {} -> {}", report.input_zone, report.output_zone),
        format!("batches       : {}", report.batches),
        format!("validated_rows: {}", report.validated_rows),
        format!("valid_rows    : {}", report.valid_rows),
        format!("exception_rows: {}", report.exception_rows),
        format!("identifiers   : {}", report.identifiers),
        format!("buckets       : {}", report.buckets),
        String::from("files:"),
        format!("  aggregated    : {}", report.files.aggregated.display()),
        format!("  data_profiling: {}", report.files.data_profiling.display()),
        format!("  data_quality  : {}", report.files.data_quality.display()),
    ];

    if !report.warnings.is_empty() {
        lines.push(String::from("warnings:"));
        lines.extend(report.warnings.iter().map(|warning| format!("  - {warning}")));
    }

    let mut table = lines.join("\n");
    table.push('\n');
    table
}
