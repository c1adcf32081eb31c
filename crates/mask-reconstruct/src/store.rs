//! Append-only collection of reconstructed surfaces.

use mask_types::{MeshObject, SurfaceMesh};

/// The surfaces produced by one build, one per successfully reconstructed
/// label.
///
/// During the build the collection sits behind the build context's mutex and
/// workers append completed objects; element order therefore reflects
/// completion order, not label order. After the scheduler's join barrier the
/// collection is read-only.
#[derive(Debug, Default)]
pub struct MeshCollection {
    objects: Vec<MeshObject>,
}

impl MeshCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reconstructed object.
    ///
    /// The scheduler hands each label to exactly one worker, so at most one
    /// object per label can ever arrive here.
    pub fn push(&mut self, object: MeshObject) {
        debug_assert!(
            self.objects.iter().all(|o| o.label != object.label),
            "duplicate label {} in mesh collection",
            object.label
        );
        self.objects.push(object);
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if no object was stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over the stored objects in completion order.
    pub fn iter(&self) -> impl Iterator<Item = &MeshObject> {
        self.objects.iter()
    }

    /// The stored labels, ascending.
    #[must_use]
    pub fn labels(&self) -> Vec<i32> {
        let mut labels: Vec<i32> = self.objects.iter().map(|o| o.label).collect();
        labels.sort_unstable();
        labels
    }

    /// Look up the object for a label.
    #[must_use]
    pub fn get(&self, label: i32) -> Option<&MeshObject> {
        self.objects.iter().find(|o| o.label == label)
    }

    /// Concatenate all surfaces into one mesh, keeping per-face labels.
    ///
    /// Surfaces are merged in ascending label order so the combined mesh is
    /// identical regardless of completion order.
    #[must_use]
    pub fn merged(&self) -> SurfaceMesh {
        let mut indices: Vec<usize> = (0..self.objects.len()).collect();
        indices.sort_unstable_by_key(|&i| self.objects[i].label);

        let mut combined = SurfaceMesh::new();
        for i in indices {
            combined.merge(&self.objects[i].surface);
        }
        combined
    }
}

impl<'a> IntoIterator for &'a MeshCollection {
    type Item = &'a MeshObject;
    type IntoIter = std::slice::Iter<'a, MeshObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mask_types::{Point3, Vertex};

    fn tagged_triangle(label: i32) -> MeshObject {
        let mut mesh = SurfaceMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        mesh.tag_faces(label);
        MeshObject::new(label, mesh, Point3::origin())
    }

    #[test]
    fn labels_are_sorted_regardless_of_insertion() {
        let mut collection = MeshCollection::new();
        collection.push(tagged_triangle(5));
        collection.push(tagged_triangle(1));
        collection.push(tagged_triangle(3));

        assert_eq!(collection.labels(), vec![1, 3, 5]);
        assert_eq!(collection.get(3).unwrap().label, 3);
        assert!(collection.get(2).is_none());
    }

    #[test]
    fn merged_concatenates_in_label_order() {
        let mut collection = MeshCollection::new();
        collection.push(tagged_triangle(7));
        collection.push(tagged_triangle(2));

        let combined = collection.merged();
        assert_eq!(combined.face_count(), 2);
        assert_eq!(combined.vertex_count(), 6);
        assert_eq!(combined.face_labels, vec![2, 7]);
    }

    #[test]
    fn empty_collection_merges_to_empty_mesh() {
        assert!(MeshCollection::new().merged().is_empty());
    }
}
