//! Parameters for decimation.

/// Parameters for QEM decimation.
#[derive(Debug, Clone)]
pub struct DecimateParams {
    /// Fraction of the original triangle count to keep, in [0, 1].
    /// Default: 0.95
    pub keep_ratio: f64,

    /// Reject collapses of boundary edges (edges with a single adjacent
    /// face). Default: true
    pub preserve_boundary: bool,
}

impl Default for DecimateParams {
    fn default() -> Self {
        Self {
            keep_ratio: 0.95,
            preserve_boundary: true,
        }
    }
}

impl DecimateParams {
    /// Create params keeping the given fraction of triangles (clamped to
    /// [0, 1]).
    #[must_use]
    pub fn with_keep_ratio(ratio: f64) -> Self {
        Self {
            keep_ratio: ratio.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Set boundary preservation.
    #[must_use]
    pub const fn with_preserve_boundary(mut self, preserve: bool) -> Self {
        self.preserve_boundary = preserve;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_most_triangles() {
        let params = DecimateParams::default();
        assert!((params.keep_ratio - 0.95).abs() < 1e-12);
        assert!(params.preserve_boundary);
    }

    #[test]
    fn keep_ratio_is_clamped() {
        assert!((DecimateParams::with_keep_ratio(1.7).keep_ratio - 1.0).abs() < 1e-12);
        assert!(DecimateParams::with_keep_ratio(-0.2).keep_ratio.abs() < 1e-12);
    }
}
