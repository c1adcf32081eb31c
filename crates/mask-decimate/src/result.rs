//! Result type for decimation.

use mask_types::SurfaceMesh;

/// Outcome of a decimation run.
#[derive(Debug, Clone)]
pub struct DecimateResult {
    /// The decimated mesh. Normals and label tags are cleared; recompute and
    /// re-tag after decimation.
    pub mesh: SurfaceMesh,

    /// Triangle count before decimation.
    pub original_faces: usize,

    /// Triangle count after decimation.
    pub final_faces: usize,

    /// Edge collapses performed.
    pub collapses_performed: usize,

    /// Edge collapses rejected to protect topology or boundaries.
    pub collapses_rejected: usize,
}

impl DecimateResult {
    /// Fraction of the original triangles that survived.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn kept_ratio(&self) -> f64 {
        if self.original_faces == 0 {
            1.0
        } else {
            self.final_faces as f64 / self.original_faces as f64
        }
    }
}

impl std::fmt::Display for DecimateResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "decimation: {} -> {} faces ({:.1}% kept, {} collapses, {} rejected)",
            self.original_faces,
            self.final_faces,
            self.kept_ratio() * 100.0,
            self.collapses_performed,
            self.collapses_rejected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kept_ratio_of_empty_input_is_one() {
        let result = DecimateResult {
            mesh: SurfaceMesh::new(),
            original_faces: 0,
            final_faces: 0,
            collapses_performed: 0,
            collapses_rejected: 0,
        };
        assert!((result.kept_ratio() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn display_reports_counts() {
        let result = DecimateResult {
            mesh: SurfaceMesh::new(),
            original_faces: 200,
            final_faces: 190,
            collapses_performed: 5,
            collapses_rejected: 1,
        };
        let text = format!("{result}");
        assert!(text.contains("200"));
        assert!(text.contains("95.0%"));
    }
}
