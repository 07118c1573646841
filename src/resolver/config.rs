use super::specials::special_var_index;

/// Inference gives up after this many passes without reaching a fixed point.
pub const MAX_RESOLVE_ITERATIONS: usize = 10000;

pub type SpecialVarLookup = fn(&str) -> usize;

#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    pub max_resolve_iterations: usize,
    /// Log the per-scope type table once indexes are assigned.
    pub debug_types: bool,
    /// Maps a special variable name to its fixed index, 0 if not special.
    pub special_var_index: SpecialVarLookup,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            max_resolve_iterations: MAX_RESOLVE_ITERATIONS,
            debug_types: false,
            special_var_index,
        }
    }
}
