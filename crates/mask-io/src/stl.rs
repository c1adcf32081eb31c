//! Binary STL writing and loading.
//!
//! STL carries bare triangle soup — no index sharing and no attribute
//! channel — so label tags are dropped on save. This is the "plain" export
//! representation; use PLY when labels must survive.
//!
//! # Binary layout
//!
//! ```text
//! UINT8[80]    – Header
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (0)
//! end
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use mask_types::{SurfaceMesh, Vertex};

use crate::error::{IoError, IoResult};

const HEADER_SIZE: usize = 80;
const TRIANGLE_SIZE: usize = 50;

/// Save a surface as binary STL.
///
/// Per-face labels, if present, are not representable in STL and are
/// silently dropped.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
#[allow(clippy::cast_possible_truncation)]
// f64 -> f32 narrowing is the STL format's precision; face counts fit u32
pub fn save_stl<P: AsRef<Path>>(mesh: &SurfaceMesh, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut header = [b' '; HEADER_SIZE];
    let text: &[u8] = b"Binary STL generated by maskmesh";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;
    writer.write_all(&(mesh.faces.len() as u32).to_le_bytes())?;

    for &[i0, i1, i2] in &mesh.faces {
        let v0 = &mesh.vertices[i0 as usize].position;
        let v1 = &mesh.vertices[i1 as usize].position;
        let v2 = &mesh.vertices[i2 as usize].position;

        let normal = (v1 - v0).cross(&(v2 - v0));
        let len = normal.norm();
        let n = if len > f64::EPSILON {
            normal / len
        } else {
            normal
        };

        for value in [n.x, n.y, n.z] {
            writer.write_all(&(value as f32).to_le_bytes())?;
        }
        for p in [v0, v1, v2] {
            for value in [p.x, p.y, p.z] {
                writer.write_all(&(value as f32).to_le_bytes())?;
            }
        }
        writer.write_all(&0_u16.to_le_bytes())?;
    }

    Ok(())
}

/// Load a binary STL file.
///
/// STL has no index sharing, so the result holds three vertices per face.
///
/// # Errors
///
/// Returns an error if the file is missing, truncated, or an ASCII STL.
#[allow(clippy::cast_possible_truncation)]
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<SurfaceMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    let mut reader = BufReader::new(file);

    let mut header = [0_u8; HEADER_SIZE + 4];
    reader.read_exact(&mut header).map_err(|_| {
        IoError::invalid_content("file too small to be a binary STL")
    })?;

    // ASCII files start with "solid" and have a text-only header
    if header.starts_with(b"solid") && !header[..HEADER_SIZE].contains(&0) {
        return Err(IoError::invalid_content(
            "ASCII STL is not supported; expected binary",
        ));
    }

    let face_count = u32::from_le_bytes([
        header[HEADER_SIZE],
        header[HEADER_SIZE + 1],
        header[HEADER_SIZE + 2],
        header[HEADER_SIZE + 3],
    ]);

    let mut mesh = SurfaceMesh::with_capacity(face_count as usize * 3, face_count as usize);
    let mut buf = [0_u8; TRIANGLE_SIZE];
    for i in 0..face_count {
        reader.read_exact(&mut buf).map_err(|_| {
            IoError::invalid_content(format!("expected {face_count} triangles, file ends at {i}"))
        })?;

        // Normal occupies the first 12 bytes; positions follow
        let base = mesh.vertices.len() as u32;
        for corner in 0..3 {
            let offset = 12 + corner * 12;
            let read = |o: usize| {
                f32::from_le_bytes([buf[o], buf[o + 1], buf[o + 2], buf[o + 3]])
            };
            mesh.vertices.push(Vertex::from_coords(
                f64::from(read(offset)),
                f64::from(read(offset + 4)),
                f64::from(read(offset + 8)),
            ));
        }
        mesh.faces.push([base, base + 1, base + 2]);
    }

    Ok(mesh)
}
