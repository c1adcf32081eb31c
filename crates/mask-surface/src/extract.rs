//! Marching-cubes isosurface extraction.

use hashbrown::HashMap;
use mask_types::{SurfaceMesh, Vertex, Volume};
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::tables::{CORNER_OFFSETS, EDGE_BASE_AXIS, EDGE_ENDPOINTS, TRI_TABLE};

/// Extract the isosurface of a scalar field at the given level.
///
/// Runs marching cubes over every grid cell, in a fixed x-fastest scan order,
/// so the output is deterministic for a given field. Vertices on shared cell
/// edges are deduplicated, producing a connected surface suitable for
/// smoothing and decimation. Each vertex carries an outward unit normal
/// derived from the field gradient.
///
/// An empty result (zero vertices) is a legitimate outcome: a field whose
/// values never cross `iso_level` inside any cell, or a grid with a
/// degenerate axis, has no surface.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// Mesh indices are u32; grids with more than 4B surface vertices are unsupported
pub fn extract_isosurface(field: &Volume, iso_level: f64) -> SurfaceMesh {
    let (nx, ny, nz) = field.dims();
    let mut mesh = SurfaceMesh::new();
    // Key: (linear grid point index, edge axis) -> mesh vertex index.
    let mut edge_vertices: HashMap<(usize, usize), u32> = HashMap::new();

    for z in 0..nz.saturating_sub(1) {
        for y in 0..ny.saturating_sub(1) {
            for x in 0..nx.saturating_sub(1) {
                march_cell(field, iso_level, (x, y, z), &mut mesh, &mut edge_vertices);
            }
        }
    }

    if mesh.vertices.is_empty() {
        debug!(iso = iso_level, "field crosses no cell; empty isosurface");
    }

    mesh
}

/// Emit the triangles for one grid cell.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn march_cell(
    field: &Volume,
    iso_level: f64,
    cell: (usize, usize, usize),
    mesh: &mut SurfaceMesh,
    edge_vertices: &mut HashMap<(usize, usize), u32>,
) {
    let (x, y, z) = cell;
    let (nx, ny, _) = field.dims();

    let mut corner_values = [0.0_f64; 8];
    let mut cube_index = 0_usize;
    for (i, &(dx, dy, dz)) in CORNER_OFFSETS.iter().enumerate() {
        let v = f64::from(field.get(x + dx, y + dy, z + dz));
        corner_values[i] = v;
        if v < iso_level {
            cube_index |= 1 << i;
        }
    }

    // Entirely inside or outside
    if cube_index == 0 || cube_index == 255 {
        return;
    }

    let row = &TRI_TABLE[cube_index];
    let mut t = 0;
    while row[t] >= 0 {
        let mut tri = [0_u32; 3];
        for (slot, &edge) in tri.iter_mut().zip(&row[t..t + 3]) {
            let edge = edge as usize;
            let (base_corner, axis) = EDGE_BASE_AXIS[edge];
            let (bx, by, bz) = CORNER_OFFSETS[base_corner];
            let point_index = (x + bx) + (y + by) * nx + (z + bz) * nx * ny;

            let index = *edge_vertices
                .entry((point_index, axis))
                .or_insert_with(|| {
                    let vertex = edge_vertex(field, iso_level, cell, edge, &corner_values);
                    mesh.vertices.push(vertex);
                    (mesh.vertices.len() - 1) as u32
                });
            *slot = index;
        }
        mesh.faces.push(tri);
        t += 3;
    }
}

/// Interpolate the surface crossing on one cell edge.
fn edge_vertex(
    field: &Volume,
    iso_level: f64,
    cell: (usize, usize, usize),
    edge: usize,
    corner_values: &[f64; 8],
) -> Vertex {
    let (x, y, z) = cell;
    let (c1, c2) = EDGE_ENDPOINTS[edge];
    let (dx1, dy1, dz1) = CORNER_OFFSETS[c1];
    let (dx2, dy2, dz2) = CORNER_OFFSETS[c2];
    let g1 = (x + dx1, y + dy1, z + dz1);
    let g2 = (x + dx2, y + dy2, z + dz2);

    let v1 = corner_values[c1];
    let v2 = corner_values[c2];
    let t = if (v2 - v1).abs() < 1e-12 {
        0.5
    } else {
        ((iso_level - v1) / (v2 - v1)).clamp(0.0, 1.0)
    };

    let p1 = field.position(g1.0, g1.1, g1.2);
    let p2 = field.position(g2.0, g2.1, g2.2);
    let position = Point3::from(p1.coords.lerp(&p2.coords, t));

    // The field decreases toward the outside, so the outward normal is the
    // negated gradient.
    let normal = gradient(field, g1).lerp(&gradient(field, g2), t);
    let len = normal.norm();
    let vertex = Vertex::new(position);
    if len > f64::EPSILON {
        vertex.with_normal(-normal / len)
    } else {
        vertex
    }
}

/// Central-difference gradient at a grid point, in world units.
///
/// Samples outside the grid read as 0.0, consistent with treating everything
/// beyond the volume as background.
fn gradient(field: &Volume, point: (usize, usize, usize)) -> Vector3<f64> {
    let (x, y, z) = point;
    let spacing = field.spacing();

    let sample = |x: usize, y: usize, z: usize| f64::from(field.get(x, y, z));
    let back = |v: usize| v.checked_sub(1);

    let dx = sample(x + 1, y, z) - back(x).map_or(0.0, |x0| sample(x0, y, z));
    let dy = sample(x, y + 1, z) - back(y).map_or(0.0, |y0| sample(x, y0, z));
    let dz = sample(x, y, z + 1) - back(z).map_or(0.0, |z0| sample(x, y, z0));

    Vector3::new(
        dx / (2.0 * spacing.x),
        dy / (2.0 * spacing.y),
        dz / (2.0 * spacing.z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mask_types::{Point3, Vector3};

    /// Solid axis-aligned block of ones inside an otherwise empty volume.
    fn block_volume(dims: (usize, usize, usize), lo: usize, hi: usize) -> Volume {
        let mut volume = Volume::zeros(dims, Vector3::new(1.0, 1.0, 1.0), Point3::origin());
        for z in lo..hi {
            for y in lo..hi {
                for x in lo..hi {
                    volume.set(x, y, z, 1.0);
                }
            }
        }
        volume
    }

    #[test]
    fn block_yields_closed_surface() {
        let volume = block_volume((10, 10, 10), 3, 7);
        let mesh = extract_isosurface(&volume, 0.5);

        assert!(!mesh.is_empty());
        // Closed CCW surface encloses positive volume close to the block's
        // 4^3, shrunk by the half-voxel crossing.
        let enclosed = mesh.signed_volume();
        assert!(enclosed > 20.0 && enclosed < 64.0, "volume {enclosed}");
    }

    #[test]
    fn surface_is_edge_connected() {
        let volume = block_volume((8, 8, 8), 2, 6);
        let mesh = extract_isosurface(&volume, 0.5);

        // Every edge of a closed manifold is shared by exactly two faces.
        let mut edge_counts: hashbrown::HashMap<(u32, u32), usize> = hashbrown::HashMap::new();
        for &[a, b, c] in &mesh.faces {
            for (v0, v1) in [(a, b), (b, c), (c, a)] {
                let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
                *edge_counts.entry(key).or_insert(0) += 1;
            }
        }
        assert!(edge_counts.values().all(|&n| n == 2));
    }

    #[test]
    fn vertices_carry_outward_normals() {
        let volume = block_volume((8, 8, 8), 2, 6);
        let mesh = extract_isosurface(&volume, 0.5);
        let center = Vector3::new(3.5, 3.5, 3.5);

        for v in &mesh.vertices {
            let n = v.normal.unwrap();
            assert!((n.norm() - 1.0).abs() < 1e-9);
            // Outward means pointing away from the block center
            assert!(n.dot(&(v.position.coords - center)) > 0.0);
        }
    }

    #[test]
    fn empty_field_yields_empty_mesh() {
        let volume = Volume::zeros((6, 6, 6), Vector3::new(1.0, 1.0, 1.0), Point3::origin());
        let mesh = extract_isosurface(&volume, 0.5);
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn degenerate_axis_yields_empty_mesh() {
        let mut volume = Volume::zeros((1, 6, 6), Vector3::new(1.0, 1.0, 1.0), Point3::origin());
        volume.set(0, 3, 3, 1.0);
        let mesh = extract_isosurface(&volume, 0.5);
        assert!(mesh.is_empty());
    }

    #[test]
    fn spacing_scales_world_coordinates() {
        let mut volume = Volume::zeros((4, 4, 4), Vector3::new(2.0, 2.0, 2.0), Point3::origin());
        volume.set(1, 1, 1, 1.0);
        volume.set(2, 1, 1, 1.0);
        let mesh = extract_isosurface(&volume, 0.5);

        let bounds = mesh.bounds();
        assert!(!bounds.is_empty());
        // Crossings sit half a cell from the voxel centers: x in [1, 6]
        assert!(bounds.min.x >= 0.9 && bounds.max.x <= 6.1);
    }
}
