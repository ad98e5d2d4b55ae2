//! `glyph`: loads one or more toy-syntax source files and runs them through
//! `Program::initialize`, printing diagnostics to stderr (§6.4).
//!
//! The `InternalError` path described for the CLI (§7) has no reachable
//! trigger here yet: nothing in this driver calls `leave_break_context` or
//! any other operation that can raise one. Diagnostics below are always the
//! user-facing `Diagnostic` kind collected on `Program::sink`.

mod args;
mod loader;

use anyhow::{bail, Context, Result};
use args::CliArgs;
use clap::Parser;
use glyph_common::DiagnosticCategory;
use glyph_program::{Program, ProgramOptions};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt().with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| filter.to_string())).init();

    if args.inputs.is_empty() {
        bail!("no input files given");
    }

    let mut options = ProgramOptions::new().with_isize_type(args.isize_type.into()).with_usize_type(args.usize_type.into());
    for alias in &args.global_alias {
        let (name, target) = alias
            .split_once('=')
            .with_context(|| format!("--global-alias expects NAME=INTERNAL_NAME, got `{alias}`"))?;
        options = options.with_global_alias(name, target);
    }

    let mut program = Program::new(options);
    let entries: FxHashSet<&Path> = args.entry.iter().map(PathBuf::as_path).collect();

    let mut sources = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let text = std::fs::read_to_string(input).with_context(|| format!("reading `{}`", input.display()))?;
        let module_path = module_path_of(input);
        let is_entry = entries.is_empty() || entries.contains(input.as_path());
        sources.push(loader::parse_source_file(&module_path, false, is_entry, &text, &program.interner));
    }

    program.initialize(&sources);
    print_diagnostics(&program);

    if program.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

fn module_path_of(input: &Path) -> String {
    input.with_extension("").to_string_lossy().replace('\\', "/")
}

fn print_diagnostics(program: &Program) {
    for diagnostic in program.sink.diagnostics() {
        let level = match diagnostic.category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
        };
        tracing::info!(target: "glyph::diagnostics", level, code = diagnostic.code, span = %diagnostic.span, "{}", diagnostic.message);
        eprintln!("{level}[{}]: {} ({})", diagnostic.code, diagnostic.message, diagnostic.span);
        for related in &diagnostic.related {
            eprintln!("  note: {} ({})", related.message, related.span);
        }
    }
}
