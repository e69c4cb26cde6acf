//! config.rs
//! Load-time options shared by the registry and the file loaders.

/// How `add_row` treats rows whose probabilities do not sum to 1.
///
/// The default is permissive: a deviation larger than `tolerance` is logged
/// and the row is stored anyway. With `strict` set the row is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPolicy {
    pub tolerance: f64,
    pub strict: bool,
}

impl RowPolicy {
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;

    pub fn strict() -> Self {
        Self { strict: true, ..Self::default() }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn is_normalized(&self, sum: f64) -> bool {
        (sum - 1.0).abs() <= self.tolerance
    }
}

impl Default for RowPolicy {
    fn default() -> Self {
        Self { tolerance: Self::DEFAULT_TOLERANCE, strict: false }
    }
}
