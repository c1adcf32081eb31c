//! Edge-collapse decimation loop.

#![allow(clippy::cast_possible_truncation)]
// Mesh indices are u32; meshes with more than 4B vertices are unsupported

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet};
use mask_types::{Point3, SurfaceMesh, Vertex};
use tracing::debug;

use crate::quadric::Quadric;
use crate::{DecimateParams, DecimateResult};

/// A candidate edge collapse, ordered cheapest-first in the heap.
#[derive(Debug, Clone)]
struct Candidate {
    v1: u32,
    v2: u32,
    cost: f64,
    target: Point3<f64>,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the BinaryHeap pops the cheapest collapse first; ties
        // break on vertex indices to keep the collapse sequence deterministic
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| (other.v1, other.v2).cmp(&(self.v1, self.v2)))
    }
}

/// Decimate a surface toward `params.keep_ratio` of its triangle count.
///
/// The result's mesh has cleared normals and label tags; recompute normals
/// and re-tag once decimation is done. A mesh already at or below the target
/// is returned unchanged.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
pub fn decimate_surface(mesh: &SurfaceMesh, params: &DecimateParams) -> DecimateResult {
    let original_faces = mesh.faces.len();
    let target = ((original_faces as f64) * params.keep_ratio).ceil() as usize;

    if original_faces == 0 || original_faces <= target {
        return DecimateResult {
            mesh: mesh.clone(),
            original_faces,
            final_faces: original_faces,
            collapses_performed: 0,
            collapses_rejected: 0,
        };
    }

    debug!(original = original_faces, target, "starting decimation");

    let mut vertices: Vec<Option<Vertex>> = mesh.vertices.iter().cloned().map(Some).collect();
    let mut faces: Vec<Option<[u32; 3]>> = mesh.faces.iter().copied().map(Some).collect();
    let mut active_faces = original_faces;

    let mut quadrics = vertex_quadrics(mesh);
    let boundary_edges = boundary_edges(&mesh.faces);

    let mut heap = BinaryHeap::new();
    for &(a, b) in collect_edges(&mesh.faces).iter() {
        push_candidate(&mut heap, a, b, &quadrics, &vertices);
    }

    // Collapsed vertex -> surviving vertex
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut collapses_performed = 0;
    let mut collapses_rejected = 0;

    while active_faces > target {
        let Some(candidate) = heap.pop() else {
            break;
        };

        let v1 = resolve(candidate.v1, &remap);
        let v2 = resolve(candidate.v2, &remap);
        if v1 == v2 || vertices[v1 as usize].is_none() || vertices[v2 as usize].is_none() {
            continue;
        }

        if params.preserve_boundary && boundary_edges.contains(&ordered(v1, v2)) {
            collapses_rejected += 1;
            continue;
        }

        if !link_condition_holds(&faces, v1, v2) {
            collapses_rejected += 1;
            continue;
        }

        // Merge v2 into v1 at the optimal position
        if let Some(v) = vertices[v1 as usize].as_mut() {
            v.position = candidate.target;
            v.normal = None;
        }
        let q2 = quadrics[v2 as usize];
        quadrics[v1 as usize].add(&q2);
        vertices[v2 as usize] = None;
        remap.insert(v2, v1);

        for face_opt in &mut faces {
            if let Some(face) = face_opt {
                for idx in face.iter_mut() {
                    *idx = resolve(*idx, &remap);
                }
                if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                    *face_opt = None;
                    active_faces -= 1;
                }
            }
        }

        collapses_performed += 1;

        // Refresh candidates around the surviving vertex, in index order so
        // the heap contents stay deterministic
        let mut ring: Vec<u32> = vertex_ring(&faces, v1).into_iter().collect();
        ring.sort_unstable();
        for neighbor in ring {
            push_candidate(&mut heap, v1, neighbor, &quadrics, &vertices);
        }
    }

    let final_mesh = compact(&vertices, &faces);

    debug!(
        final_faces = active_faces,
        collapses = collapses_performed,
        rejected = collapses_rejected,
        "decimation finished"
    );

    DecimateResult {
        mesh: final_mesh,
        original_faces,
        final_faces: active_faces,
        collapses_performed,
        collapses_rejected,
    }
}

/// Quadric per vertex: sum of the plane quadrics of its adjacent faces.
fn vertex_quadrics(mesh: &SurfaceMesh) -> Vec<Quadric> {
    let mut quadrics = vec![Quadric::default(); mesh.vertices.len()];
    for &[i0, i1, i2] in &mesh.faces {
        let p0 = mesh.vertices[i0 as usize].position;
        let p1 = mesh.vertices[i1 as usize].position;
        let p2 = mesh.vertices[i2 as usize].position;
        let n = (p1 - p0).cross(&(p2 - p0));
        let len = n.norm();
        if len <= f64::EPSILON {
            continue;
        }
        let q = Quadric::from_plane(n / len, p0);
        quadrics[i0 as usize].add(&q);
        quadrics[i1 as usize].add(&q);
        quadrics[i2 as usize].add(&q);
    }
    quadrics
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn collect_edges(faces: &[[u32; 3]]) -> Vec<(u32, u32)> {
    let mut edges = HashSet::new();
    for face in faces {
        for i in 0..3 {
            edges.insert(ordered(face[i], face[(i + 1) % 3]));
        }
    }
    let mut edges: Vec<_> = edges.into_iter().collect();
    // Deterministic heap seeding regardless of hash order
    edges.sort_unstable();
    edges
}

/// Edges adjacent to exactly one face.
fn boundary_edges(faces: &[[u32; 3]]) -> HashSet<(u32, u32)> {
    let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
    for face in faces {
        for i in 0..3 {
            *counts.entry(ordered(face[i], face[(i + 1) % 3])).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter_map(|(edge, count)| (count == 1).then_some(edge))
        .collect()
}

fn resolve(mut v: u32, remap: &HashMap<u32, u32>) -> u32 {
    while let Some(&next) = remap.get(&v) {
        v = next;
    }
    v
}

fn push_candidate(
    heap: &mut BinaryHeap<Candidate>,
    v1: u32,
    v2: u32,
    quadrics: &[Quadric],
    vertices: &[Option<Vertex>],
) {
    let (Some(a), Some(b)) = (vertices[v1 as usize].as_ref(), vertices[v2 as usize].as_ref())
    else {
        return;
    };

    let q = quadrics[v1 as usize].sum(&quadrics[v2 as usize]);
    let target = q.optimal_point().unwrap_or_else(|| {
        // Degenerate metric: take the cheapest of the endpoints and midpoint
        let mid = nalgebra::center(&a.position, &b.position);
        let mut best = a.position;
        let mut best_cost = q.evaluate(best);
        for p in [b.position, mid] {
            let cost = q.evaluate(p);
            if cost < best_cost {
                best = p;
                best_cost = cost;
            }
        }
        best
    });

    heap.push(Candidate {
        v1,
        v2,
        cost: q.evaluate(target),
        target,
    });
}

/// Link condition: the common neighbors of the endpoints must be exactly the
/// vertices opposite the faces shared by the edge. Anything more would pinch
/// the surface into a non-manifold configuration.
fn link_condition_holds(faces: &[Option<[u32; 3]>], v1: u32, v2: u32) -> bool {
    let ring1 = vertex_ring(faces, v1);
    let ring2 = vertex_ring(faces, v2);
    let common = ring1.intersection(&ring2).count();

    let shared_faces = faces
        .iter()
        .flatten()
        .filter(|f| f.contains(&v1) && f.contains(&v2))
        .count();

    common == shared_faces
}

fn vertex_ring(faces: &[Option<[u32; 3]>], v: u32) -> HashSet<u32> {
    let mut ring = HashSet::new();
    for face in faces.iter().flatten() {
        if face.contains(&v) {
            for &u in face {
                if u != v {
                    ring.insert(u);
                }
            }
        }
    }
    ring
}

/// Rebuild a compact mesh from the surviving vertices and faces.
fn compact(vertices: &[Option<Vertex>], faces: &[Option<[u32; 3]>]) -> SurfaceMesh {
    let mut mesh = SurfaceMesh::new();
    let mut index_map: HashMap<u32, u32> = HashMap::new();

    for (old_index, vertex) in vertices.iter().enumerate() {
        if let Some(v) = vertex {
            index_map.insert(old_index as u32, mesh.vertices.len() as u32);
            mesh.vertices.push(Vertex::new(v.position));
        }
    }

    for face in faces.iter().flatten() {
        let (Some(&a), Some(&b), Some(&c)) = (
            index_map.get(&face[0]),
            index_map.get(&face[1]),
            index_map.get(&face[2]),
        ) else {
            continue;
        };
        mesh.faces.push([a, b, c]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use mask_surface::extract_isosurface;
    use mask_types::{Vector3, Volume};

    fn ball_surface() -> SurfaceMesh {
        let n = 16;
        let mut volume = Volume::zeros((n, n, n), Vector3::new(1.0, 1.0, 1.0), Point3::origin());
        let c = 7.5;
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    #[allow(clippy::cast_precision_loss)]
                    let d = ((x as f64 - c).powi(2) + (y as f64 - c).powi(2)
                        + (z as f64 - c).powi(2))
                    .sqrt();
                    if d < 5.5 {
                        volume.set(x, y, z, 1.0);
                    }
                }
            }
        }
        extract_isosurface(&volume, 0.5)
    }

    fn edge_face_counts(mesh: &SurfaceMesh) -> HashMap<(u32, u32), usize> {
        let mut counts = HashMap::new();
        for face in &mesh.faces {
            for i in 0..3 {
                *counts.entry(ordered(face[i], face[(i + 1) % 3])).or_insert(0) += 1;
            }
        }
        counts
    }

    #[test]
    fn empty_mesh_passes_through() {
        let result = decimate_surface(&SurfaceMesh::new(), &DecimateParams::default());
        assert_eq!(result.final_faces, 0);
        assert_eq!(result.collapses_performed, 0);
    }

    #[test]
    fn keep_ratio_one_is_a_noop() {
        let mesh = ball_surface();
        let result = decimate_surface(&mesh, &DecimateParams::with_keep_ratio(1.0));
        assert_eq!(result.final_faces, mesh.face_count());
        assert_eq!(result.collapses_performed, 0);
    }

    #[test]
    fn decimation_approaches_target() {
        let mesh = ball_surface();
        let result = decimate_surface(&mesh, &DecimateParams::with_keep_ratio(0.5));

        assert!(result.final_faces < mesh.face_count());
        // Each collapse removes two faces, so the loop lands within one
        // collapse of the target
        #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
        let target = ((mesh.face_count() as f64) * 0.5).ceil() as usize;
        assert!(result.final_faces + 2 >= target);
        assert!(result.collapses_performed > 0);
    }

    #[test]
    fn decimated_closed_surface_stays_manifold() {
        let mesh = ball_surface();
        let result = decimate_surface(&mesh, &DecimateParams::with_keep_ratio(0.6));

        // Still closed: every edge shared by exactly two faces
        assert!(edge_face_counts(&result.mesh).values().all(|&n| n == 2));
        // Still a topological sphere: V - E + F == 2
        let v = result.mesh.vertex_count() as i64;
        let e = edge_face_counts(&result.mesh).len() as i64;
        let f = result.mesh.face_count() as i64;
        assert_eq!(v - e + f, 2);
    }

    #[test]
    fn default_keep_ratio_trims_gently() {
        let mesh = ball_surface();
        let result = decimate_surface(&mesh, &DecimateParams::default());
        // Within one collapse of the 95% target
        assert!(result.kept_ratio() > 0.9);
        assert!(result.final_faces <= mesh.face_count());
    }
}
