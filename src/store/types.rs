use serde::{Serialize, Deserialize};

/// Stable arena handle for a variable. Indexes every column of the `Registry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct VarId(pub u32);

impl VarId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// A (variable name, value) pair as it appears in CPT rows and evidence.
pub type Assignment = (String, String);
