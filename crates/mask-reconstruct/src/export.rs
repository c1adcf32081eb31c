//! Combined-surface export.

use std::path::Path;

use mask_io::{save_ply, save_stl};
use tracing::info;

use crate::error::ExportError;
use crate::store::MeshCollection;

/// Write the union of all stored surfaces as binary STL.
///
/// STL has no attribute channel, so the per-face labels are intentionally
/// dropped; callers that need label-aware downstream processing must use
/// [`export_attributed`].
///
/// # Errors
///
/// - [`ExportError::EmptyCollection`] if nothing was reconstructed; no file
///   is created
/// - [`ExportError::Write`] if the underlying writer fails; no retry
pub fn export_plain<P: AsRef<Path>>(
    collection: &MeshCollection,
    path: P,
) -> Result<(), ExportError> {
    if collection.is_empty() {
        return Err(ExportError::EmptyCollection);
    }

    let combined = collection.merged();
    save_stl(&combined, &path)?;
    info!(
        surfaces = collection.len(),
        faces = combined.face_count(),
        path = %path.as_ref().display(),
        "exported plain STL"
    );
    Ok(())
}

/// Write the union of all stored surfaces as binary PLY, preserving the
/// per-face integer `label` attribute.
///
/// Downstream consumers can recover, for every triangle, the label that
/// produced it.
///
/// # Errors
///
/// - [`ExportError::EmptyCollection`] if nothing was reconstructed; no file
///   is created
/// - [`ExportError::Write`] if the underlying writer fails; no retry
pub fn export_attributed<P: AsRef<Path>>(
    collection: &MeshCollection,
    path: P,
) -> Result<(), ExportError> {
    if collection.is_empty() {
        return Err(ExportError::EmptyCollection);
    }

    let combined = collection.merged();
    save_ply(&combined, &path)?;
    info!(
        surfaces = collection.len(),
        faces = combined.face_count(),
        path = %path.as_ref().display(),
        "exported attributed PLY"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mask_types::{MeshObject, Point3, SurfaceMesh, Vertex};

    fn collection_with_one_triangle() -> MeshCollection {
        let mut mesh = SurfaceMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        mesh.tag_faces(2);

        let mut collection = MeshCollection::new();
        collection.push(MeshObject::new(2, mesh, Point3::origin()));
        collection
    }

    #[test]
    fn empty_collection_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.stl");

        let result = export_plain(&MeshCollection::new(), &path);
        assert!(matches!(result, Err(ExportError::EmptyCollection)));
        assert!(!path.exists());

        let result = export_attributed(&MeshCollection::new(), dir.path().join("out.ply"));
        assert!(matches!(result, Err(ExportError::EmptyCollection)));
    }

    #[test]
    fn plain_export_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.stl");

        export_plain(&collection_with_one_triangle(), &path).unwrap();
        assert!(path.exists());

        let loaded = mask_io::load_stl(&path).unwrap();
        assert_eq!(loaded.face_count(), 1);
        assert!(loaded.face_labels.is_empty());
    }

    #[test]
    fn attributed_export_keeps_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ply");

        export_attributed(&collection_with_one_triangle(), &path).unwrap();
        let loaded = mask_io::load_ply(&path).unwrap();
        assert_eq!(loaded.face_labels, vec![2]);
    }

    #[test]
    fn unwritable_path_is_a_write_error() {
        let result = export_plain(
            &collection_with_one_triangle(),
            "/nonexistent-dir-5531/out.stl",
        );
        assert!(matches!(result, Err(ExportError::Write(_))));
    }
}
