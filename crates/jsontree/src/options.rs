//! Parser configuration.

/// Default nesting limit for [`ParseOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Limits applied while decoding text.
///
/// The tree itself has no depth limit; this only bounds what the parser
/// accepts from untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting depth of arrays and objects. A top-level container
    /// counts as depth 1.
    pub max_depth: usize,
}

impl ParseOptions {
    /// Tight limits for input from untrusted sources.
    pub const fn strict() -> Self {
        Self { max_depth: 64 }
    }

    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
