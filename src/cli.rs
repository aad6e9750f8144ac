//! Command line arguments for the `mini` binary

use std::path::PathBuf;

use clap::Parser;

use crate::driver::{AnalyzeOptions, OutputFormat};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Syntax checker for the Mini language
///
/// With no FILE and no --batch, reads programs line by line from standard input.
#[derive(Debug, Parser)]
#[command(name = "mini", author, about)]
pub struct MiniArgs {
    /// Source file to analyze
    pub file: Option<PathBuf>,

    /// Do not print the syntax tree of a valid program
    #[arg(long)]
    pub no_ast: bool,

    /// Print the token sequence
    #[arg(long)]
    pub tokens: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Analyze every *.mini file in DIR; names containing "fail" must be rejected
    #[arg(long, value_name = "DIR", conflicts_with = "file")]
    pub batch: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MiniArgs {
    /// Report settings selected by the flags
    pub fn options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            show_ast: !self.no_ast,
            show_tokens: self.tokens,
            format: self.format,
        }
    }
}
