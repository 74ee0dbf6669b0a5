//! Convert command implementation
//!
//! Resolves the input paths, converts every workbook through the
//! dispatcher and writes the merged JSON.

use super::shared::{ConversionStats, create_progress_bar, load_configuration, setup_logging};
use crate::app::services::dispatcher::{DispatchStrategy, Dispatcher};
use crate::app::services::file_converter::FileConverter;
use crate::app::services::input_resolver::InputResolver;
use crate::app::services::json_writer::JsonWriter;
use crate::cli::args::ConvertArgs;
use crate::constants::PROGRESS_BAR_MIN_FILES;
use crate::Result;
use colored::*;
use indicatif::HumanDuration;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert command runner
///
/// 1. Set up logging and configuration
/// 2. Expand inputs into workbook files
/// 3. Convert and merge with progress reporting
/// 4. Write the JSON output and print a summary
pub async fn run_convert(args: ConvertArgs) -> Result<ConversionStats> {
    let start_time = Instant::now();

    setup_logging(&args)?;

    info!("Starting xlsx-json conversion");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let schema = Arc::new(config.schema()?);
    let resolver = InputResolver::new(&config.extensions);
    let files = resolver.resolve(&args.from)?;

    let mut stats = ConversionStats {
        files_resolved: files.len(),
        ..Default::default()
    };

    if files.is_empty() {
        warn!(
            "No workbook files with extensions {:?} found in the given inputs",
            resolver.extensions()
        );
    }

    let mode = args.mode();
    let strategy = args.strategy(config.performance.sequential);

    let mut dispatcher = Dispatcher::new(FileConverter::new(schema), mode)
        .with_workers(config.performance.workers);

    let progress = if args.show_progress() && files.len() >= PROGRESS_BAR_MIN_FILES {
        let pb = create_progress_bar(files.len() as u64, "Converting workbooks");
        dispatcher = dispatcher.with_progress(pb.clone());
        Some(pb)
    } else {
        None
    };

    let outcome = dispatcher.dispatch(files, strategy).await;

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }
    let outcome = outcome?;

    stats.files_converted = outcome.stats.files_converted;
    stats.files_skipped = outcome.stats.files_skipped();
    stats.workers_used = outcome.stats.workers_used;
    stats.sheets_written = outcome.result.len();

    let writer = JsonWriter::new().pretty(config.output.pretty);
    let written = writer.write(&outcome.result, &args.output_target())?;
    stats.output_sizes = written
        .into_iter()
        .map(|file| (file.path.display().to_string(), file.bytes))
        .collect();

    stats.processing_time = start_time.elapsed();

    if !args.quiet {
        print_summary(&stats, &outcome.stats.skipped_files);
    }

    info!(
        "Conversion finished: {} converted, {} skipped, {} sheets",
        stats.files_converted, stats.files_skipped, stats.sheets_written
    );

    Ok(stats)
}

fn print_summary(stats: &ConversionStats, skipped: &[std::path::PathBuf]) {
    println!("\n{}", "Conversion Summary".bright_green().bold());
    println!(
        "  Files converted: {} of {}",
        stats.files_converted.to_string().bright_white().bold(),
        stats.files_resolved
    );
    if stats.files_skipped > 0 {
        println!(
            "  Files skipped:   {}",
            stats.files_skipped.to_string().bright_red().bold()
        );
        for path in skipped {
            println!("    {}", path.display().to_string().yellow());
        }
    }
    println!(
        "  Sheets written:  {}",
        stats.sheets_written.to_string().bright_white().bold()
    );
    for (path, size) in &stats.output_sizes {
        println!(
            "  Output:          {} ({})",
            path.cyan(),
            ConversionStats::format_size(*size)
        );
    }
    println!(
        "  Time:            {}",
        HumanDuration(stats.processing_time)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{Args, Commands};
    use crate::Error;
    use clap::Parser;
    use rust_xlsxwriter::Workbook;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_workbook(path: &Path, sheet: &str, rows: &[&[&str]]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save(path).unwrap();
    }

    fn convert_args(argv: &[&str]) -> ConvertArgs {
        let mut full = vec!["xlsx-json", "convert", "-q"];
        full.extend_from_slice(argv);
        match Args::try_parse_from(full).unwrap().command {
            Some(Commands::Convert(args)) => args,
            None => panic!("Expected convert command"),
        }
    }

    #[tokio::test]
    async fn test_run_convert_writes_document() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("users.xlsx");
        let output = temp_dir.path().join("out.json");
        write_workbook(
            &input,
            "users",
            &[&["id", "name"], &["int", "string"], &["", ""], &["1", "Alpha"]],
        );

        let config = temp_dir.path().join("config.toml");
        fs::write(&config, "extensions = [\"xlsx\"]\n").unwrap();

        let input_arg = input.to_string_lossy().to_string();
        let output_arg = output.to_string_lossy().to_string();
        let config_arg = config.to_string_lossy().to_string();
        let stats = run_convert(convert_args(&[
            "-f",
            &input_arg,
            "-t",
            &output_arg,
            "-c",
            &config_arg,
        ]))
        .await
        .unwrap();

        assert_eq!(stats.files_resolved, 1);
        assert_eq!(stats.files_converted, 1);
        assert_eq!(stats.sheets_written, 1);
        assert_eq!(stats.output_sizes.len(), 1);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["users"][0]["name"], "Alpha");
    }

    #[tokio::test]
    async fn test_run_convert_missing_input_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.xlsx").to_string_lossy().to_string();
        let output = temp_dir.path().join("out.json");
        let output_arg = output.to_string_lossy().to_string();

        let config = temp_dir.path().join("config.toml");
        fs::write(&config, "").unwrap();
        let config_arg = config.to_string_lossy().to_string();

        let err = run_convert(convert_args(&[
            "-f",
            &missing,
            "-t",
            &output_arg,
            "-c",
            &config_arg,
        ]))
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InvalidInputPath { .. }));
        assert!(!output.exists());
    }
}
