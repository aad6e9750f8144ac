//! Source analysis, report rendering and the batch test runner
//!
//! Everything the `mini` binary prints goes through [`render_report`], so file mode,
//! the interactive prompt and batch mode produce identical reports.

use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Diagnostic, Error, Result};
use crate::lexer::Token;
use crate::parser::{ParseOutput, Program};
use crate::printer::AstPrinter;

const HEAVY_RULE: &str = "============================================================";
const RULE: &str = "========================================";
const THIN_RULE: &str = "----------------------------------------";

/// Report layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// Machine-readable document
    Json,
}

/// What a report should contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Print the syntax tree of a valid program
    pub show_ast: bool,
    /// Print the token sequence
    pub show_tokens: bool,
    /// Report layout
    pub format: OutputFormat,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            show_ast: true,
            show_tokens: false,
            format: OutputFormat::Text,
        }
    }
}

/// Tokens and parse result for one source text
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Token sequence, ending with the end-of-input marker
    pub tokens: Vec<Token>,
    /// Tree plus diagnostics
    pub output: ParseOutput,
}

impl Analysis {
    /// True when the program has no diagnostics
    pub fn is_success(&self) -> bool {
        self.output.is_success()
    }
}

/// Scans and parses `source`. Lexical errors are returned as `Err`.
pub fn analyze_source(source: &str) -> Result<Analysis> {
    let tokens = crate::tokenize(source)?;
    let output = crate::parse(tokens.clone());
    Ok(Analysis { tokens, output })
}

/// True when the analysis found a valid program
pub fn is_accepted(result: &Result<Analysis>) -> bool {
    matches!(result, Ok(analysis) if analysis.is_success())
}

/// Renders the report for one analyzed source
pub fn render_report(
    name: &str,
    source: &str,
    result: &Result<Analysis>,
    options: &AnalyzeOptions,
) -> String {
    match options.format {
        OutputFormat::Text => render_text(name, source, result, options),
        OutputFormat::Json => render_json(name, result, options),
    }
}

fn render_text(
    name: &str,
    source: &str,
    result: &Result<Analysis>,
    options: &AnalyzeOptions,
) -> String {
    let mut out = Vec::new();

    out.push(HEAVY_RULE.to_string());
    out.push(format!("Analyzing: {}", name));
    out.push(HEAVY_RULE.to_string());
    out.push("Source:".to_string());
    out.push(THIN_RULE.to_string());
    for (i, line) in source.lines().enumerate() {
        out.push(format!("{:3}: {}", i + 1, line));
    }
    out.push(THIN_RULE.to_string());

    let analysis = match result {
        Ok(analysis) => analysis,
        Err(err) => {
            out.push(String::new());
            out.push(RULE.to_string());
            out.push(format!("✗ {}", err));
            out.push(RULE.to_string());
            return out.join("\n");
        }
    };

    if options.show_tokens {
        out.push(String::new());
        out.push("Tokens:".to_string());
        for token in &analysis.tokens {
            out.push(format!("  {:>4}:{:<4} {}", token.line, token.column, token.describe()));
        }
    }

    let diagnostics = &analysis.output.diagnostics;
    out.push(String::new());
    out.push(RULE.to_string());
    if diagnostics.is_empty() {
        out.push("✓ Program is syntactically valid".to_string());
        out.push(RULE.to_string());
        if options.show_ast {
            out.push(String::new());
            out.push("Syntax tree:".to_string());
            out.push(THIN_RULE.to_string());
            out.push(AstPrinter::new().print(&analysis.output.program));
        }
    } else {
        out.push(format!("✗ Found {} error(s)", diagnostics.len()));
        out.push(RULE.to_string());
        for (i, diagnostic) in diagnostics.iter().enumerate() {
            out.push(String::new());
            out.push(format!("Error {}:", i + 1));
            out.push(format!("  {}", diagnostic));
        }
        out.push(RULE.to_string());
    }

    out.join("\n")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    name: &'a str,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokens: Option<&'a [Token]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    program: Option<&'a Program>,
    diagnostics: &'a [Diagnostic],
}

fn render_json(name: &str, result: &Result<Analysis>, options: &AnalyzeOptions) -> String {
    let report = match result {
        Ok(analysis) => JsonReport {
            name,
            success: analysis.is_success(),
            error: None,
            tokens: options.show_tokens.then_some(analysis.tokens.as_slice()),
            program: options.show_ast.then_some(&analysis.output.program),
            diagnostics: &analysis.output.diagnostics,
        },
        Err(err) => JsonReport {
            name,
            success: false,
            error: Some(err.to_string()),
            tokens: None,
            program: None,
            diagnostics: &[],
        },
    };

    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!("{{\"name\":{:?},\"error\":{:?}}}", name, e.to_string()))
}

/// Report for one file, plus the verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Rendered report
    pub report: String,
    /// True when the file holds a valid program
    pub accepted: bool,
}

/// Reads and analyzes one file
pub fn analyze_file(path: &Path, options: &AnalyzeOptions) -> Result<FileReport> {
    let source = read_source(path)?;
    let result = analyze_source(&source);
    let accepted = is_accepted(&result);

    tracing::debug!(path = %path.display(), accepted, "analyzed file");

    Ok(FileReport {
        report: render_report(&path.display().to_string(), &source, &result, options),
        accepted,
    })
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

//--------------------------------------------------------------------------------------------------
// Batch runner
//--------------------------------------------------------------------------------------------------

/// Outcome of a batch run, file names in sorted order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files whose verdict matched the expectation
    pub passed: Vec<String>,
    /// Files whose verdict did not
    pub failed: Vec<String>,
}

impl BatchSummary {
    /// Number of files analyzed
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }

    /// True when every expectation held
    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }

    /// Summary block printed by the binary
    pub fn render(&self) -> String {
        let mut out = vec![
            HEAVY_RULE.to_string(),
            "Test summary".to_string(),
            HEAVY_RULE.to_string(),
            format!("✓ Passed: {}", self.passed.len()),
            format!("✗ Failed: {}", self.failed.len()),
            format!("Total: {}", self.total()),
            "No per-file time limit; every parse terminates".to_string(),
        ];
        if !self.failed.is_empty() {
            out.push(String::new());
            out.push("Failed tests:".to_string());
            out.extend(self.failed.iter().map(|name| format!("  - {}", name)));
        }
        out.join("\n")
    }
}

/// Files whose name contains `fail` must be rejected; all others must be accepted
pub fn expects_rejection(file_name: &str) -> bool {
    file_name.contains("fail")
}

/// Analyzes every `*.mini` file in `dir` and checks each verdict against its name
pub fn run_batch(dir: &Path) -> Result<BatchSummary> {
    let entries = fs::read_dir(dir).map_err(|e| Error::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "mini"))
        .collect();
    files.sort();

    tracing::debug!(dir = %dir.display(), files = files.len(), "starting batch");

    let outcomes: Vec<(String, bool)> = files
        .par_iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let accepted = read_source(path)
                .map(|source| is_accepted(&analyze_source(&source)))
                .unwrap_or(false);
            let met = accepted != expects_rejection(&name);
            tracing::debug!(file = %name, accepted, met, "batch file");
            (name, met)
        })
        .collect();

    let mut summary = BatchSummary::default();
    for (name, met) in outcomes {
        if met {
            summary.passed.push(name);
        } else {
            summary.failed.push(name);
        }
    }
    Ok(summary)
}
