//! Core smoothing passes.

use hashbrown::{HashMap, HashSet};
use mask_types::{SurfaceMesh, Vector3};

use crate::SmoothParams;

/// Result of a smoothing run.
#[derive(Debug, Clone)]
pub struct SmoothResult {
    /// The smoothed mesh. Vertex normals are stale; recompute before use.
    pub mesh: SurfaceMesh,

    /// Number of iterations performed.
    pub iterations_performed: u32,

    /// Largest single-vertex displacement seen across all passes, in world
    /// units.
    pub max_displacement: f64,
}

/// Smooth a surface with alternating λ/μ Laplacian passes.
///
/// Boundary vertices are pinned unless `params.smooth_boundaries` is set;
/// vertices on feature edges are pinned when `params.preserve_feature_edges`
/// is set. The input mesh's face and label channels are untouched — only
/// vertex positions move.
#[must_use]
pub fn smooth_surface(mesh: &SurfaceMesh, params: &SmoothParams) -> SmoothResult {
    if mesh.vertices.is_empty() || mesh.faces.is_empty() || params.iterations == 0 {
        return SmoothResult {
            mesh: mesh.clone(),
            iterations_performed: params.iterations,
            max_displacement: 0.0,
        };
    }

    let mut working = mesh.clone();

    // Normalize into a unit box around the center so the pass weights act on
    // a consistent scale regardless of where the volume sits in the world.
    let transform = if params.normalize_coordinates {
        let bounds = working.bounds();
        let side = bounds.longest_side();
        (side > f64::EPSILON).then(|| {
            let center = bounds.center();
            for v in &mut working.vertices {
                v.position.coords = (v.position.coords - center.coords) / side;
            }
            (center, side)
        })
    } else {
        None
    };

    let neighbors = vertex_neighbors(&working);
    let pinned = pinned_vertices(&working, params);
    let (lambda, mu) = params.weights();

    let mut max_displacement = 0.0_f64;
    for _ in 0..params.iterations {
        max_displacement = max_displacement.max(laplacian_pass(
            &mut working,
            &neighbors,
            &pinned,
            lambda,
        ));
        max_displacement = max_displacement.max(laplacian_pass(&mut working, &neighbors, &pinned, mu));
    }

    if let Some((center, side)) = transform {
        for v in &mut working.vertices {
            v.position.coords = v.position.coords * side + center.coords;
        }
        max_displacement *= side;
    }

    SmoothResult {
        mesh: working,
        iterations_performed: params.iterations,
        max_displacement,
    }
}

/// One weighted Laplacian step; returns the largest displacement.
fn laplacian_pass(
    mesh: &mut SurfaceMesh,
    neighbors: &HashMap<u32, Vec<u32>>,
    pinned: &HashSet<u32>,
    factor: f64,
) -> f64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let displacements: Vec<Option<Vector3<f64>>> = mesh
        .vertices
        .iter()
        .enumerate()
        .map(|(i, vertex)| {
            let idx = i as u32;
            if pinned.contains(&idx) {
                return None;
            }
            let ring = neighbors.get(&idx)?;
            if ring.is_empty() {
                return None;
            }
            let sum: Vector3<f64> = ring
                .iter()
                .map(|&n| mesh.vertices[n as usize].position.coords)
                .sum();
            let centroid = sum / ring.len() as f64;
            Some((centroid - vertex.position.coords) * factor)
        })
        .collect();

    let mut max_displacement = 0.0_f64;
    for (vertex, displacement) in mesh.vertices.iter_mut().zip(displacements) {
        if let Some(d) = displacement {
            max_displacement = max_displacement.max(d.norm());
            vertex.position += d;
        }
    }
    max_displacement
}

/// Map each vertex to its one-ring neighbors.
///
/// Rings are sorted so the centroid sums accumulate in a fixed order and
/// repeated runs stay bitwise identical.
fn vertex_neighbors(mesh: &SurfaceMesh) -> HashMap<u32, Vec<u32>> {
    let mut neighbors: HashMap<u32, HashSet<u32>> = HashMap::new();
    for face in &mesh.faces {
        for i in 0..3 {
            let v = face[i];
            neighbors.entry(v).or_default().insert(face[(i + 1) % 3]);
            neighbors.entry(v).or_default().insert(face[(i + 2) % 3]);
        }
    }
    neighbors
        .into_iter()
        .map(|(k, set)| {
            let mut ring: Vec<u32> = set.into_iter().collect();
            ring.sort_unstable();
            (k, ring)
        })
        .collect()
}

/// Vertices held fixed during smoothing: boundary vertices (unless boundary
/// smoothing is on) and feature-edge vertices (when preservation is on).
fn pinned_vertices(mesh: &SurfaceMesh, params: &SmoothParams) -> HashSet<u32> {
    let mut edge_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (fi, face) in mesh.faces.iter().enumerate() {
        for i in 0..3 {
            let (a, b) = (face[i], face[(i + 1) % 3]);
            let key = if a < b { (a, b) } else { (b, a) };
            edge_faces.entry(key).or_default().push(fi);
        }
    }

    let mut pinned = HashSet::new();
    let angle_cos = params.feature_angle_deg.to_radians().cos();

    for (&(a, b), faces) in &edge_faces {
        let pin = match faces.as_slice() {
            [_] => !params.smooth_boundaries,
            [f0, f1] if params.preserve_feature_edges => {
                // Dihedral sharper than the feature angle: face normals
                // diverge beyond the threshold.
                let n0 = face_normal(mesh, *f0);
                let n1 = face_normal(mesh, *f1);
                n0.dot(&n1) < angle_cos
            }
            _ => false,
        };
        if pin {
            pinned.insert(a);
            pinned.insert(b);
        }
    }
    pinned
}

fn face_normal(mesh: &SurfaceMesh, face_index: usize) -> Vector3<f64> {
    let [i0, i1, i2] = mesh.faces[face_index];
    let p0 = mesh.vertices[i0 as usize].position;
    let p1 = mesh.vertices[i1 as usize].position;
    let p2 = mesh.vertices[i2 as usize].position;
    let n = (p1 - p0).cross(&(p2 - p0));
    let len = n.norm();
    if len > f64::EPSILON {
        n / len
    } else {
        Vector3::zeros()
    }
}
