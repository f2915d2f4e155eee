//=====================================================================
// Isomeric branching-ratio input.
//
// Entries come from an external branching-ratio reader covering far
// more nuclides than any one problem loads. The isomeric pass matches
// them by ZAI, attaches the ratio to the representative reaction and
// discards the rest.
//=====================================================================

/// Fraction of a reaction leading to the excited final state.
#[derive(Debug, Clone, PartialEq)]
pub enum BranchRatio {
    /// Energy-independent scalar fraction.
    Fixed(f64),
    /// Fraction tabulated against incident energy. Both vectors have
    /// the same length and `energy` ascends.
    Tabulated { energy: Vec<f64>, fraction: Vec<f64> },
}

impl BranchRatio {
    pub fn is_tabulated(&self) -> bool {
        matches!(self, BranchRatio::Tabulated { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchListEntry {
    pub zai: i32,
    pub mt: i32,
    pub ratio: BranchRatio,
}
