//! CLI arguments for the `glyph` binary (§6.4).

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Runs the semantic-analysis core over one or more toy-syntax source files.
#[derive(Parser, Debug)]
#[command(name = "glyph", version, about = "Semantic-analysis driver for the glyph core")]
pub struct CliArgs {
    /// Source files to load and initialize.
    pub inputs: Vec<PathBuf>,

    /// Marks an input as the program's entry file (repeatable; matched by path).
    #[arg(long = "entry")]
    pub entry: Vec<PathBuf>,

    /// Binds ALIAS to an already-declared internal name, repeatable.
    #[arg(long = "global-alias", value_name = "NAME=INTERNAL_NAME")]
    pub global_alias: Vec<String>,

    /// Width used for `isize`.
    #[arg(long = "isize-type", value_enum, default_value_t = PointerWidthArg::Bits32)]
    pub isize_type: PointerWidthArg,

    /// Width used for `usize`.
    #[arg(long = "usize-type", value_enum, default_value_t = PointerWidthArg::Bits32)]
    pub usize_type: PointerWidthArg,

    /// Increases log verbosity; repeatable.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PointerWidthArg {
    Bits32,
    Bits64,
}

impl From<PointerWidthArg> for glyph_types::PointerWidth {
    fn from(value: PointerWidthArg) -> Self {
        match value {
            PointerWidthArg::Bits32 => glyph_types::PointerWidth::Bits32,
            PointerWidthArg::Bits64 => glyph_types::PointerWidth::Bits64,
        }
    }
}

impl std::fmt::Display for PointerWidthArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointerWidthArg::Bits32 => write!(f, "bits32"),
            PointerWidthArg::Bits64 => write!(f, "bits64"),
        }
    }
}
