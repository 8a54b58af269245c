//! Per-analysis-type colors.
//!
//! Every analysis type gets a palette slot the first time it is seen in a
//! session and keeps it for the rest of the session, even if its result is
//! removed or the results are reordered.

use std::collections::HashMap;

/// Eight distinguishable overlay colors (blue, green, purple, orange, pink,
/// teal, indigo, red).
pub const PALETTE: [&str; 8] = [
    "#3b82f6", "#22c55e", "#a855f7", "#f97316", "#ec4899", "#14b8a6", "#6366f1", "#ef4444",
];

/// Palette color for an ordinal, cycling past the eighth type.
pub fn palette_color(ordinal: usize) -> &'static str {
    PALETTE[ordinal % PALETTE.len()]
}

#[derive(Debug, Clone, Default)]
pub struct ColorAssigner {
    ordinals: HashMap<String, usize>,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for `analysis_type_id`, assigning the next slot if it is new.
    pub fn assign(&mut self, analysis_type_id: &str) -> &'static str {
        let next = self.ordinals.len();
        let ordinal = *self
            .ordinals
            .entry(analysis_type_id.to_string())
            .or_insert(next);
        palette_color(ordinal)
    }

    /// Color already assigned to `analysis_type_id`, if any.
    pub fn get(&self, analysis_type_id: &str) -> Option<&'static str> {
        self.ordinals.get(analysis_type_id).map(|&o| palette_color(o))
    }

    pub fn ordinal(&self, analysis_type_id: &str) -> Option<usize> {
        self.ordinals.get(analysis_type_id).copied()
    }
}
