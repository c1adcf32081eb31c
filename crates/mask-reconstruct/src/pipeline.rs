//! Per-label geometry pipeline.

use std::time::Instant;

use mask_decimate::decimate_surface;
use mask_smooth::smooth_surface;
use mask_surface::{extract_isosurface, threshold_label};
use mask_types::{MeshObject, Volume};
use tracing::debug;

use crate::report::{LabelEvent, LabelTiming};
use crate::ReconstructParams;

/// Isosurface level for the binary field: halfway between background (0)
/// and the selected label (1).
const ISO_LEVEL: f64 = 0.5;

/// Run the full pipeline for one label.
///
/// Threshold → isosurface extraction → optional smoothing → optional
/// decimation → normal refresh → attribute tagging. All intermediate buffers
/// are owned by the calling worker; only the final object is moved out.
///
/// Returns the event to record and, unless the isosurface was empty, the
/// finished [`MeshObject`].
pub(crate) fn process_label(
    volume: &Volume,
    label: i32,
    params: &ReconstructParams,
) -> (LabelEvent, Option<MeshObject>) {
    let start = Instant::now();

    let binary = threshold_label(volume, label);
    let mut surface = extract_isosurface(&binary, ISO_LEVEL);
    drop(binary);

    if surface.vertex_count() == 0 {
        debug!(label, "empty isosurface, skipping label");
        return (
            LabelEvent::Empty {
                label,
                elapsed: start.elapsed(),
            },
            None,
        );
    }

    if let Some(smoothing) = &params.smoothing {
        surface = smooth_surface(&surface, smoothing).mesh;
    }

    if let Some(decimation) = &params.decimation {
        let result = decimate_surface(&surface, decimation);
        debug!(label, %result, "decimated label surface");
        surface = result.mesh;
    }

    // Smoothing and decimation leave normals stale
    if params.smoothing.is_some() || params.decimation.is_some() {
        surface.recompute_normals();
    }

    surface.tag_faces(label);

    let timing = LabelTiming {
        label,
        elapsed: start.elapsed(),
        vertices: surface.vertex_count(),
        faces: surface.face_count(),
    };
    debug!(
        label,
        vertices = timing.vertices,
        faces = timing.faces,
        elapsed = ?timing.elapsed,
        "label surface complete"
    );

    let object = MeshObject::new(label, surface, volume.origin());
    (LabelEvent::Completed(timing), Some(object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mask_types::{Point3, Vector3};

    fn two_block_volume() -> Volume {
        let mut volume = Volume::zeros((12, 12, 12), Vector3::new(1.0, 1.0, 1.0), Point3::origin());
        for z in 2..5 {
            for y in 2..5 {
                for x in 2..5 {
                    volume.set(x, y, z, 1.0);
                }
            }
        }
        for z in 7..10 {
            for y in 7..10 {
                for x in 7..10 {
                    volume.set(x, y, z, 4.0);
                }
            }
        }
        volume
    }

    #[test]
    fn produces_tagged_object_for_present_label() {
        let volume = two_block_volume();
        let (event, object) = process_label(&volume, 4, &ReconstructParams::raw());

        let object = object.unwrap();
        assert_eq!(object.label, 4);
        assert!(object.surface.is_tagged());
        assert!(object.surface.face_labels.iter().all(|&l| l == 4));
        assert_eq!(object.origin, Point3::origin());
        assert!(matches!(event, LabelEvent::Completed(_)));
    }

    #[test]
    fn absent_label_yields_empty_event() {
        let volume = two_block_volume();
        let (event, object) = process_label(&volume, 9, &ReconstructParams::raw());

        assert!(object.is_none());
        assert!(matches!(event, LabelEvent::Empty { label: 9, .. }));
    }

    #[test]
    fn full_pipeline_keeps_surface_closed() {
        let volume = two_block_volume();
        let (_, object) = process_label(&volume, 1, &ReconstructParams::default());
        let surface = object.unwrap().surface;

        assert!(surface.signed_volume() > 0.0);
        assert!(surface.vertices.iter().all(|v| v.normal.is_some()));
        assert!(surface.is_tagged());
    }

    #[test]
    fn timing_reflects_final_counts() {
        let volume = two_block_volume();
        let (event, object) = process_label(&volume, 1, &ReconstructParams::default());
        let surface = object.unwrap().surface;

        let LabelEvent::Completed(timing) = event else {
            panic!("expected completion event");
        };
        assert_eq!(timing.vertices, surface.vertex_count());
        assert_eq!(timing.faces, surface.face_count());
    }
}
