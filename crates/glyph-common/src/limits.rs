//! Centralized thresholds, kept separate so call sites don't hardcode magic numbers.

/// Default cap on the number of diagnostics a single `Program::initialize` run will
/// collect before it stops reporting new ones (it keeps resolving, it just stops
/// growing the sink) — bounds memory on pathological or generated inputs.
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 2000;

/// Field byte sizes the layout algorithm is allowed to align to (I5).
pub const VALID_FIELD_ALIGNMENTS: [u32; 4] = [1, 2, 4, 8];
