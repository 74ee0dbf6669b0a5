use anyhow::Context;
use clap::Parser;
use std::process;
use xlsx_json::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let result = tokio::runtime::Runtime::new()
        .context("Failed to create async runtime")
        .and_then(|runtime| Ok(runtime.block_on(commands::run(args))?));

    match result {
        Ok(_stats) => {
            // Summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("xlsx-json - Spreadsheet Workbook to JSON Converter");
    println!("==================================================");
    println!();
    println!("Convert xlsx workbooks into a JSON document keyed by sheet name.");
    println!("A row-format schema marks key, value-type and comment rows; every");
    println!("other row becomes a record.");
    println!();
    println!("USAGE:");
    println!("    xlsx-json <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    convert     Convert xlsx files or directories into JSON");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Convert a directory of workbooks into one document:");
    println!("    xlsx-json convert --from ./sheets --to data.json");
    println!();
    println!("    # Column headers only, one file per sheet:");
    println!("    xlsx-json convert --from a.xlsx,b.xlsx --to ./out --only-header --multiple-output");
    println!();
    println!("For detailed help on any command, use:");
    println!("    xlsx-json <COMMAND> --help");
}
