//! Parameters for surface smoothing.

/// Parameters for shrink-compensated smoothing.
#[derive(Debug, Clone)]
pub struct SmoothParams {
    /// Number of smoothing iterations. Default: 15
    pub iterations: u32,

    /// Pass-band k in (0, 2): fraction of high-frequency detail retained.
    /// Smaller values smooth harder. Default: 0.1
    pub pass_band: f64,

    /// Dihedral angle in degrees above which an edge counts as a feature
    /// edge. Only consulted when `preserve_feature_edges` is set.
    /// Default: 120.0
    pub feature_angle_deg: f64,

    /// Allow boundary vertices to move. When false (default), open-surface
    /// boundaries are held fixed.
    pub smooth_boundaries: bool,

    /// Pin vertices on feature edges (sharper than `feature_angle_deg`) so
    /// sharp creases survive smoothing. Default: false
    pub preserve_feature_edges: bool,

    /// Scale the surface into a unit box around its center before smoothing
    /// and back afterwards, keeping repeated passes numerically well-behaved
    /// for volumes far from the origin. Default: true
    pub normalize_coordinates: bool,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            iterations: 15,
            pass_band: 0.1,
            feature_angle_deg: 120.0,
            smooth_boundaries: false,
            preserve_feature_edges: false,
            normalize_coordinates: true,
        }
    }
}

impl SmoothParams {
    /// Set the iteration count.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the pass-band (clamped to (0, 2)).
    #[must_use]
    pub fn with_pass_band(mut self, pass_band: f64) -> Self {
        self.pass_band = pass_band.clamp(1e-3, 2.0 - 1e-3);
        self
    }

    /// Set the feature angle threshold in degrees.
    #[must_use]
    pub const fn with_feature_angle_deg(mut self, angle: f64) -> Self {
        self.feature_angle_deg = angle;
        self
    }

    /// Allow or pin boundary vertices.
    #[must_use]
    pub const fn with_smooth_boundaries(mut self, smooth: bool) -> Self {
        self.smooth_boundaries = smooth;
        self
    }

    /// Enable or disable feature-edge preservation.
    #[must_use]
    pub const fn with_preserve_feature_edges(mut self, preserve: bool) -> Self {
        self.preserve_feature_edges = preserve;
        self
    }

    /// The smoothing/inflation weight pair (λ, μ) derived from the pass-band.
    ///
    /// λ is fixed at 0.5; μ solves 1/λ + 1/μ = k, so μ is negative for any
    /// pass-band below 2 and the two passes cancel shrinkage.
    #[must_use]
    pub fn weights(&self) -> (f64, f64) {
        let lambda = 0.5;
        let k = self.pass_band.clamp(1e-3, 2.0 - 1e-3);
        let mu = 1.0 / (k - 1.0 / lambda);
        (lambda, mu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_params() {
        let params = SmoothParams::default();
        assert_eq!(params.iterations, 15);
        assert_relative_eq!(params.pass_band, 0.1);
        assert!(!params.smooth_boundaries);
        assert!(!params.preserve_feature_edges);
        assert!(params.normalize_coordinates);
    }

    #[test]
    fn weights_from_default_pass_band() {
        let (lambda, mu) = SmoothParams::default().weights();
        assert_relative_eq!(lambda, 0.5);
        // k = 0.1 gives the classic mu near -0.53
        assert_relative_eq!(mu, 1.0 / (0.1 - 2.0), epsilon = 1e-12);
        assert!(mu < 0.0 && mu.abs() > lambda);
    }

    #[test]
    fn pass_band_controls_inflation_magnitude() {
        // A wider pass-band backs off harder on each smoothing step
        let narrow = SmoothParams::default().with_pass_band(0.01).weights().1;
        let wide = SmoothParams::default().with_pass_band(1.0).weights().1;
        assert!(narrow.abs() < wide.abs());
        assert!(wide < 0.0);
    }

    #[test]
    fn pass_band_is_clamped() {
        let params = SmoothParams::default().with_pass_band(5.0);
        assert!(params.pass_band < 2.0);
        let (_, mu) = params.weights();
        assert!(mu < 0.0);
    }

    #[test]
    fn builder_chain() {
        let params = SmoothParams::default()
            .with_iterations(3)
            .with_feature_angle_deg(60.0)
            .with_smooth_boundaries(true)
            .with_preserve_feature_edges(true);
        assert_eq!(params.iterations, 3);
        assert_relative_eq!(params.feature_angle_deg, 60.0);
        assert!(params.smooth_boundaries);
        assert!(params.preserve_feature_edges);
    }
}
