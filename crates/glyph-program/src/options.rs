//! `ProgramOptions` (§2.1, §6.3): the configuration threaded into
//! `Program::initialize`.

use glyph_graph::names::LIBRARY_PREFIX;
use glyph_types::PointerWidth;
use rustc_hash::FxHashMap;

/// Builder-style configuration for a `Program` run.
///
/// `global_aliases` maps an alias name to the internal name it should resolve
/// to (`@global`-decorated or library-exported elements bound under a second,
/// shorter name — §4.1 step 8).
#[derive(Clone, Debug)]
pub struct ProgramOptions {
    pub isize_type: PointerWidth,
    pub usize_type: PointerWidth,
    pub source_map: bool,
    pub global_aliases: FxHashMap<String, String>,
    /// Promotes I6 (managed/unmanaged mixing) violations to hard errors even
    /// under best-effort recovery. On by default; the drain phase already
    /// reports them as errors regardless, so this only matters to a caller
    /// that wants to distinguish strict failure from lenient warnings.
    pub strict_unmanaged: bool,
    pub max_diagnostics: usize,
    pub library_prefix: String,
}

impl ProgramOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_isize_type(mut self, width: PointerWidth) -> Self {
        self.isize_type = width;
        self
    }

    pub fn with_usize_type(mut self, width: PointerWidth) -> Self {
        self.usize_type = width;
        self
    }

    pub fn with_source_map(mut self, enabled: bool) -> Self {
        self.source_map = enabled;
        self
    }

    pub fn with_global_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.global_aliases.insert(alias.into(), target.into());
        self
    }

    pub fn with_max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = max;
        self
    }
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            isize_type: PointerWidth::Bits32,
            usize_type: PointerWidth::Bits32,
            source_map: false,
            global_aliases: FxHashMap::default(),
            strict_unmanaged: true,
            max_diagnostics: glyph_common::limits::DEFAULT_MAX_DIAGNOSTICS,
            library_prefix: LIBRARY_PREFIX.to_string(),
        }
    }
}
