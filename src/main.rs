//! `mini` checks Mini programs for syntax and scope errors.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze one file; exit status is 0 for a valid program, 1 otherwise
//! mini program.mini
//!
//! # Skip the tree, show tokens, or emit JSON
//! mini program.mini --no-ast --tokens --format json
//!
//! # Run every *.mini file in a directory; names containing "fail" must be rejected
//! mini --batch test_cases
//!
//! # Interactive: one program per line, `quit` or `exit` to leave
//! mini
//! ```

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use minilang::cli::MiniArgs;
use minilang::driver::{self, AnalyzeOptions};

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let args = MiniArgs::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    let options = args.options();

    if let Some(dir) = &args.batch {
        let summary = driver::run_batch(dir)?;
        println!("{}", summary.render());
        return Ok(exit_code(summary.all_passed()));
    }

    match &args.file {
        Some(path) => match driver::analyze_file(path, &options) {
            Ok(report) => {
                println!("{}", report.report);
                Ok(exit_code(report.accepted))
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                Ok(ExitCode::FAILURE)
            }
        },
        None => {
            interactive(&options)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Reads one program per line until `quit`, `exit` or end of input
fn interactive(options: &AnalyzeOptions) -> Result<()> {
    println!("Mini syntax checker {} - interactive mode", minilang::VERSION);
    println!("Enter Mini code and press Enter to analyze it; 'quit' or 'exit' to leave");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            break;
        };
        let source = line.trim();
        if source.eq_ignore_ascii_case("quit") || source.eq_ignore_ascii_case("exit") {
            break;
        }
        if source.is_empty() {
            continue;
        }

        let result = driver::analyze_source(source);
        println!(
            "{}",
            driver::render_report("<stdin>", source, &result, options)
        );
    }

    Ok(())
}
